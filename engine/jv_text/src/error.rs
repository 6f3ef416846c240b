//! Parse errors.

use std::fmt;

/// What went wrong while parsing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Input ended inside a value (or contained no value at all).
    UnexpectedEnd,
    /// Text that is not a JSON token, including malformed string escapes.
    InvalidToken,
    /// A valid token where the grammar does not allow it.
    UnexpectedToken,
    /// More input after a complete top-level value.
    TrailingContent,
    /// Arrays and objects nested deeper than the configured limit.
    DepthLimitExceeded,
    /// A number literal outside the JSON number grammar (`01`, `1.`, `1e`).
    InvalidNumber,
}

impl ParseErrorKind {
    fn describe(self) -> &'static str {
        match self {
            ParseErrorKind::UnexpectedEnd => "unexpected end of input",
            ParseErrorKind::InvalidToken => "invalid token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::TrailingContent => "trailing content after value",
            ParseErrorKind::DepthLimitExceeded => "nesting depth limit exceeded",
            ParseErrorKind::InvalidNumber => "invalid number literal",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A parse failure with its position in the input.
///
/// `offset` is a byte offset; `line` and `column` are 1-based, with the
/// column counted in characters.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    /// Build an error at `offset` in `source`, resolving line and column.
    pub(crate) fn at(kind: ParseErrorKind, source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
        ParseError {
            kind,
            offset,
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}
