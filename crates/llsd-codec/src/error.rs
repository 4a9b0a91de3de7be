use thiserror::Error;

/// Failure reported by the `Result` layer of the notation parser.
///
/// The counting API ([`NotationParser::parse`](crate::NotationParser::parse))
/// never returns this type; it folds every failure into
/// [`PARSE_FAILURE`](crate::PARSE_FAILURE).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at byte {offset}")]
pub struct NotationError {
    pub kind: NotationErrorKind,
    /// Offset from the start of the parsed region where the failure was
    /// detected.
    pub offset: usize,
}

impl NotationError {
    pub(crate) fn new(kind: NotationErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Returns `true` when the input simply ran out (end of buffer or byte
    /// limit) rather than containing a syntax error.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self.kind, NotationErrorKind::UnexpectedEnd)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotationErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unrecognized character {0:#04x}")]
    UnrecognizedTag(u8),
    #[error("unterminated {0}")]
    Unterminated(&'static str),
    #[error("invalid integer")]
    InvalidInteger,
    #[error("invalid real")]
    InvalidReal,
    #[error("invalid uuid")]
    InvalidUuid,
    #[error("invalid date")]
    InvalidDate,
    #[error("invalid binary encoding")]
    InvalidBinary,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid length prefix")]
    InvalidLength,
    #[error("nesting deeper than {0}")]
    DepthExceeded(usize),
}

/// Failure reported by [`MimeParser::try_parse_index`](crate::MimeParser::try_parse_index).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MimeError {
    #[error("header line without a colon at byte {0}")]
    MissingColon(usize),
    #[error("unterminated quoted boundary parameter")]
    UnterminatedBoundary,
    #[error("expected CRLF after content at byte {0}")]
    MissingCrlf(usize),
    #[error("no MIME headers found")]
    Empty,
}
