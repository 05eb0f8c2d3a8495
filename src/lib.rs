//! Strict parsing, rendering, and precedence ordering for [Semantic
//! Versioning 2.0.0](https://semver.org) version strings.
//!
//! Exactly the grammar and nothing else: no `v` prefixes, no whitespace
//! trimming, no partial versions, no repair of almost-valid input.

use std::cmp::{self, Ordering};
use std::fmt;

use nom::combinator::all_consuming;
use nom::Err;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

pub use error::{SemverError, SemverErrorKind};
pub use identifier::Identifier;

mod error;
mod identifier;
mod parse;

/// A parsed semantic version.
///
/// Equality and ordering follow SemVer precedence: build metadata is
/// carried, rendered, and otherwise ignored.
#[derive(Clone, Debug)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Vec<Identifier>,
    pub build: Vec<String>,
}

impl Version {
    /// Parses a version string according to the SemVer 2.0.0 grammar.
    ///
    /// The entire input must be a version: surrounding whitespace, a
    /// leading `v`, missing or extra fields, leading zeros, and empty or
    /// malformed identifiers are all hard errors.
    pub fn parse<S: AsRef<str>>(input: S) -> Result<Version, SemverError> {
        let input = input.as_ref();

        match all_consuming(crate::parse::version)(input) {
            Ok((_, version)) => Ok(version),
            Err(err) => Err(match err {
                Err::Error(e) | Err::Failure(e) => SemverError::new(
                    input.into(),
                    e.input.as_ptr() as usize - input.as_ptr() as usize,
                    if let Some(kind) = e.kind {
                        kind
                    } else if let Some(ctx) = e.context {
                        SemverErrorKind::Context(ctx)
                    } else {
                        SemverErrorKind::Other
                    },
                ),
                Err::Incomplete(_) => {
                    SemverError::new(input.into(), input.len(), SemverErrorKind::IncompleteInput)
                }
            }),
        }
    }

    /// True if this version has no pre-release section.
    ///
    /// Build metadata has no bearing on release status.
    pub fn is_release(&self) -> bool {
        self.pre_release.is_empty()
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.pre_release == other.pre_release
    }
}

impl Eq for Version {}

impl std::hash::Hash for Version {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.pre_release.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        for (i, ident) in self.pre_release.iter().enumerate() {
            if i == 0 {
                write!(f, "-")?;
            } else {
                write!(f, ".")?;
            }
            write!(f, "{}", ident)?;
        }

        for (i, ident) in self.build.iter().enumerate() {
            if i == 0 {
                write!(f, "+")?;
            } else {
                write!(f, ".")?;
            }
            write!(f, "{}", ident)?;
        }

        Ok(())
    }
}

impl std::convert::From<(u64, u64, u64)> for Version {
    fn from((major, minor, patch): (u64, u64, u64)) -> Self {
        Version {
            major,
            minor,
            patch,
            pre_release: Vec::new(),
            build: Vec::new(),
        }
    }
}

impl std::str::FromStr for Version {
    type Err = SemverError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VersionVisitor;

        impl<'de> Visitor<'de> for VersionVisitor {
            type Value = Version;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a version string")
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Version::parse(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(VersionVisitor)
    }
}

impl cmp::PartialOrd for Version {
    fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl cmp::Ord for Version {
    fn cmp(&self, other: &Version) -> cmp::Ordering {
        match self.major.cmp(&other.major) {
            Ordering::Equal => {}
            //if difference in major version, just return result
            order_result => return order_result,
        }

        match self.minor.cmp(&other.minor) {
            Ordering::Equal => {}
            //if difference in minor version, just return result
            order_result => return order_result,
        }

        match self.patch.cmp(&other.patch) {
            Ordering::Equal => {}
            //if difference in patch version, just return result
            order_result => return order_result,
        }

        match (self.pre_release.len(), other.pre_release.len()) {
            //if no pre_release identifiers, they're equal
            (0, 0) => Ordering::Equal,
            //if other has a pre-release, but this doesn't, this one is greater
            (0, _) => Ordering::Greater,
            //if this one has a pre-release, but other doesn't, this one is less than
            (_, 0) => Ordering::Less,
            // if both have pre_release identifiers, compare them pairwise;
            // on an equal prefix the shorter list is less
            (_, _) => self.pre_release.cmp(&other.pre_release),
        }
    }
}

/// Sorts versions in place, ascending by precedence.
///
/// The sort is stable: versions that differ only in build metadata
/// compare equal and keep their input order.
pub fn sort(versions: &mut [Version]) {
    versions.sort();
}
