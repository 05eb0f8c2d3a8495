use nom::bytes::complete::{tag, take_while};
use nom::combinator::{cut, map, map_res, opt};
use nom::error::context;
use nom::multi::separated_list1;
use nom::sequence::{preceded, tuple};
use nom::IResult;

use crate::error::{SemverErrorKind, SemverParseError};
use crate::identifier::{has_leading_zero, is_digits, is_identifier_char, Identifier};
use crate::Version;

/// <valid semver> ::= <version core>
///                 | <version core> "-" <pre-release>
///                 | <version core> "+" <build>
///                 | <version core> "-" <pre-release> "+" <build>
pub(crate) fn version(input: &str) -> IResult<&str, Version, SemverParseError<&str>> {
    context(
        "version",
        map(
            tuple((version_core, extras)),
            |((major, minor, patch), (pre_release, build))| Version {
                major,
                minor,
                patch,
                pre_release,
                build,
            },
        ),
    )(input)
}

fn extras(input: &str) -> IResult<&str, (Vec<Identifier>, Vec<String>), SemverParseError<&str>> {
    map(
        tuple((opt(pre_release), opt(build))),
        |(pre_release, build)| (pre_release.unwrap_or_default(), build.unwrap_or_default()),
    )(input)
}

/// <version core> ::= <major> "." <minor> "." <patch>
///
/// Core fields run up to the first `.`, `-`, or `+`, so the first `-`
/// after the core starts the pre-release and the first `+` starts the
/// build, wherever they appear. Requiring exactly three fields here is
/// what rejects `1.2` and `1.2.3.4` outright instead of partially
/// parsing them.
fn version_core(input: &str) -> IResult<&str, (u64, u64, u64), SemverParseError<&str>> {
    context(
        "version core",
        map_res(
            separated_list1(tag("."), core_chunk),
            |fields: Vec<&str>| {
                if fields.len() < 3 {
                    return Err(fail(input, SemverErrorKind::MissingField(fields.join("."))));
                }
                if fields.len() > 3 {
                    return Err(fail(input, SemverErrorKind::TooManyFields(fields.join("."))));
                }
                let major = core_number(fields[0])?;
                let minor = core_number(fields[1])?;
                let patch = core_number(fields[2])?;
                Ok((major, minor, patch))
            },
        ),
    )(input)
}

fn core_chunk(input: &str) -> IResult<&str, &str, SemverParseError<&str>> {
    take_while(|c: char| c != '.' && c != '-' && c != '+')(input)
}

/// Core fields are numeric identifiers: ASCII digits only, and no
/// leading zero unless the field is exactly `0`.
fn core_number(field: &str) -> Result<u64, SemverParseError<&str>> {
    if !is_digits(field) {
        return Err(fail(field, SemverErrorKind::NonNumeric(field.into())));
    }
    if has_leading_zero(field) {
        return Err(fail(field, SemverErrorKind::LeadingZero(field.into())));
    }
    field
        .parse()
        .map_err(|_| fail(field, SemverErrorKind::Overflow(field.into())))
}

/// <pre-release> ::= <dot-separated pre-release identifiers>
fn pre_release(input: &str) -> IResult<&str, Vec<Identifier>, SemverParseError<&str>> {
    context(
        "pre-release",
        preceded(tag("-"), separated_list1(tag("."), pre_release_identifier)),
    )(input)
}

/// <pre-release identifier> ::= <alphanumeric identifier>
///                            | <numeric identifier>
///
/// `cut` commits us: once the `-` sigil has been consumed, a bad
/// identifier is a hard failure, not something to backtrack from.
fn pre_release_identifier(input: &str) -> IResult<&str, Identifier, SemverParseError<&str>> {
    cut(map_res(
        take_while(|c: char| c != '.' && c != '+'),
        |chunk: &str| {
            if chunk.is_empty() {
                return Err(fail(chunk, SemverErrorKind::EmptyIdentifier));
            }
            if chunk.chars().any(|c| !is_identifier_char(c)) {
                return Err(fail(chunk, SemverErrorKind::InvalidCharacter(chunk.into())));
            }
            if is_digits(chunk) {
                if has_leading_zero(chunk) {
                    return Err(fail(chunk, SemverErrorKind::LeadingZero(chunk.into())));
                }
                let value = chunk
                    .parse()
                    .map_err(|_| fail(chunk, SemverErrorKind::Overflow(chunk.into())))?;
                return Ok(Identifier::Numeric(value));
            }
            Ok(Identifier::AlphaNumeric(chunk.into()))
        },
    ))(input)
}

/// <build> ::= <dot-separated build identifiers>
fn build(input: &str) -> IResult<&str, Vec<String>, SemverParseError<&str>> {
    context(
        "build metadata",
        preceded(tag("+"), separated_list1(tag("."), build_identifier)),
    )(input)
}

/// <build identifier> ::= <alphanumeric identifier> | <digits>
///
/// Unlike pre-release numeric identifiers, `<digits>` here may carry
/// leading zeros: `001` is a legal build identifier. Stored verbatim so
/// it renders back out unchanged.
fn build_identifier(input: &str) -> IResult<&str, String, SemverParseError<&str>> {
    cut(map_res(take_while(|c: char| c != '.'), |chunk: &str| {
        if chunk.is_empty() {
            return Err(fail(chunk, SemverErrorKind::EmptyIdentifier));
        }
        if chunk.chars().any(|c| !is_identifier_char(c)) {
            return Err(fail(chunk, SemverErrorKind::InvalidCharacter(chunk.into())));
        }
        Ok(chunk.to_string())
    }))(input)
}

fn fail<'a>(input: &'a str, kind: SemverErrorKind) -> SemverParseError<&'a str> {
    SemverParseError {
        input,
        context: None,
        kind: Some(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Identifier::{AlphaNumeric, Numeric};

    use pretty_assertions::assert_eq;

    #[test]
    fn hyphen_after_plus_belongs_to_the_build() {
        let (rest, v) = version("1.2.3+build-1").unwrap();
        assert_eq!(rest, "");
        assert_eq!(v.pre_release, vec![]);
        assert_eq!(v.build, vec![String::from("build-1")]);
    }

    #[test]
    fn plus_inside_pre_release_starts_the_build() {
        let (rest, v) = version("1.2.3-alpha+sha.5114f85").unwrap();
        assert_eq!(rest, "");
        assert_eq!(v.pre_release, vec![AlphaNumeric("alpha".into())]);
        assert_eq!(
            v.build,
            vec![String::from("sha"), String::from("5114f85")]
        );
    }

    #[test]
    fn later_hyphens_stay_inside_pre_release_identifiers() {
        // 1.0.0-x-y-z.-- is a legal example straight from the semver spec.
        let (rest, v) = version("1.0.0-x-y-z.--").unwrap();
        assert_eq!(rest, "");
        assert_eq!(
            v.pre_release,
            vec![AlphaNumeric("x-y-z".into()), AlphaNumeric("--".into())]
        );
    }

    #[test]
    fn numeric_and_alphanumeric_identifiers_are_tagged() {
        let (_, v) = version("1.0.0-rc.1.0.x7").unwrap();
        assert_eq!(
            v.pre_release,
            vec![
                AlphaNumeric("rc".into()),
                Numeric(1),
                Numeric(0),
                AlphaNumeric("x7".into()),
            ]
        );
    }

    #[test]
    fn core_stops_at_the_first_sigil() {
        // A 4-field core is over-long even when a pre-release follows.
        let err = version("1.2.3.4-alpha").unwrap_err();
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                assert_eq!(
                    e.kind,
                    Some(SemverErrorKind::TooManyFields("1.2.3.4".into()))
                );
            }
            nom::Err::Incomplete(_) => panic!("complete parser"),
        }
    }
}
