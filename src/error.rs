use std::fmt;

use miette::{Diagnostic, LabeledSpan};
use nom::error::{ContextError, ErrorKind, FromExternalError, ParseError};
use thiserror::Error;

/// Error returned when a version string fails to parse.
///
/// Carries the full input, the byte offset of the offending section, and
/// the failure [`SemverErrorKind`].
#[derive(Debug, Error, Eq, PartialEq)]
#[error("Error parsing semver string. {kind}")]
pub struct SemverError {
    input: String,
    offset: usize,
    kind: SemverErrorKind,
}

impl SemverError {
    pub(crate) fn new(input: String, offset: usize, kind: SemverErrorKind) -> Self {
        Self {
            input,
            offset,
            kind,
        }
    }

    /// The input that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Byte offset into the input where parsing failed.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// What went wrong.
    pub fn kind(&self) -> &SemverErrorKind {
        &self.kind
    }

    pub fn location(&self) -> (usize, usize) {
        // Taken partially from nom.
        let prefix = &self.input.as_bytes()[..self.offset];

        // Count the number of newlines in the first `offset` bytes of input
        let line_number = bytecount::count(prefix, b'\n');

        // Find the line that includes the subslice:
        // Find the *last* newline before the substring starts
        let line_begin = prefix
            .iter()
            .rev()
            .position(|&b| b == b'\n')
            .map(|pos| self.offset - pos)
            .unwrap_or(0);

        // Find the full line after that newline
        let line = self.input[line_begin..]
            .lines()
            .next()
            .unwrap_or(&self.input[line_begin..])
            .trim_end();

        // The (1-indexed) column number is the offset of our substring into that line
        let column_number = self.input[self.offset..].as_ptr() as usize - line.as_ptr() as usize;

        (line_number, column_number)
    }
}

impl Diagnostic for SemverError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind.code()
    }

    fn severity(&self) -> Option<miette::Severity> {
        self.kind.severity()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind.help()
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.input)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let len = match &self.kind {
            SemverErrorKind::MissingField(s)
            | SemverErrorKind::TooManyFields(s)
            | SemverErrorKind::NonNumeric(s)
            | SemverErrorKind::LeadingZero(s)
            | SemverErrorKind::Overflow(s)
            | SemverErrorKind::InvalidCharacter(s) => s.len(),
            _ => 0,
        };
        Some(Box::new(std::iter::once(LabeledSpan::new(
            Some("here".into()),
            self.offset,
            len,
        ))))
    }
}

#[derive(Debug, Diagnostic, Error, Eq, PartialEq)]
pub enum SemverErrorKind {
    #[error("Version core `{0}` has fewer than three dot-separated fields. Versions take the form MAJOR.MINOR.PATCH.")]
    #[diagnostic(code(strictver::missing_field))]
    MissingField(String),

    #[error("Version core `{0}` has more than three dot-separated fields. Versions take the form MAJOR.MINOR.PATCH.")]
    #[diagnostic(code(strictver::too_many_fields))]
    TooManyFields(String),

    #[error("`{0}` is not a plain number. Major, minor, and patch fields are ASCII digits only.")]
    #[diagnostic(code(strictver::non_numeric))]
    NonNumeric(String),

    #[error("Numeric identifier `{0}` has a leading zero.")]
    #[diagnostic(code(strictver::leading_zero))]
    LeadingZero(String),

    #[error("Numeric component `{0}` does not fit in 64 bits.")]
    #[diagnostic(code(strictver::overflow))]
    Overflow(String),

    #[error("Empty identifier. Pre-release and build identifiers need at least one character.")]
    #[diagnostic(code(strictver::empty_identifier))]
    EmptyIdentifier,

    #[error("Identifier `{0}` contains a character outside [0-9A-Za-z-].")]
    #[diagnostic(code(strictver::invalid_character))]
    InvalidCharacter(String),

    #[error("Incomplete input to semver parser.")]
    #[diagnostic(code(strictver::incomplete_input))]
    IncompleteInput,

    #[error("Failed to parse {0} component of semver string.")]
    #[diagnostic(code(strictver::component_parse_error))]
    Context(&'static str),

    #[error("An unspecified error occurred.")]
    #[diagnostic(code(strictver::other))]
    Other,
}

#[derive(Debug)]
pub(crate) struct SemverParseError<I> {
    pub(crate) input: I,
    pub(crate) context: Option<&'static str>,
    pub(crate) kind: Option<SemverErrorKind>,
}

impl<I> ParseError<I> for SemverParseError<I> {
    fn from_error_kind(input: I, _kind: nom::error::ErrorKind) -> Self {
        Self {
            input,
            context: None,
            kind: None,
        }
    }

    fn append(_input: I, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I> ContextError<I> for SemverParseError<I> {
    fn add_context(_input: I, ctx: &'static str, mut other: Self) -> Self {
        other.context = Some(ctx);
        other
    }
}

// Several parsers manually return SemverParseError from inside a map_res,
// so this pass-through impl is actually needed.
impl<'a> FromExternalError<&'a str, SemverParseError<&'a str>> for SemverParseError<&'a str> {
    fn from_external_error(
        _input: &'a str,
        _kind: ErrorKind,
        e: SemverParseError<&'a str>,
    ) -> Self {
        e
    }
}

#[cfg(test)]
mod tests {
    use crate::Version;

    use pretty_assertions::assert_eq;

    #[test]
    fn offset_points_at_offending_identifier() {
        let err = Version::parse("1.2.3-alpha.01").unwrap_err();
        assert_eq!(err.offset(), 12);
        assert_eq!(err.location(), (0, 12));
        assert_eq!(err.input(), "1.2.3-alpha.01");
    }

    #[test]
    fn message_names_the_offending_substring() {
        let err = Version::parse("1.2.3-alpha_beta").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error parsing semver string. Identifier `alpha_beta` contains a character outside [0-9A-Za-z-]."
        );
    }
}
