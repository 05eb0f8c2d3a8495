use std::cmp::Ordering;
use std::fmt;

/// A single pre-release identifier, tagged at parse time.
///
/// Precedence dispatches on the tag pair: numerics compare numerically,
/// alphanumerics compare in ASCII order, and a numeric identifier always
/// has lower precedence than an alphanumeric one.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Identifier {
    /// An identifier that's solely numbers.
    Numeric(u64),
    /// An identifier with letters and numbers.
    AlphaNumeric(String),
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(x), Identifier::Numeric(y)) => x.cmp(y),
            (Identifier::AlphaNumeric(x), Identifier::AlphaNumeric(y)) => x.cmp(y),
            (Identifier::Numeric(_), Identifier::AlphaNumeric(_)) => Ordering::Less,
            (Identifier::AlphaNumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::AlphaNumeric(s) => write!(f, "{}", s),
        }
    }
}

/// The only characters an identifier may contain.
pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `0` itself is fine; `007` is not a numeric identifier.
pub(crate) fn has_leading_zero(s: &str) -> bool {
    s.len() > 1 && s.starts_with('0')
}
