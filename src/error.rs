//! Contains the `ParseError` and `Error` types for the library.
use crate::token::TokenKind;
use std::io;
use std::path::PathBuf;

/// The error type for all tokenizing and parsing operations.
///
/// Every variant that points at a token carries the token's kind and the
/// byte offset where it starts. Use [`ParseError::location`] to turn the
/// offset into a line and column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input held no tokens at all (empty, or only whitespace).
    #[error("No tokens to parse")]
    NoTokens,

    /// A production needed another token but the input was exhausted.
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    /// The token does not fit the grammar at this position.
    #[error("Unexpected token {found} {context} at position {offset}")]
    UnexpectedToken {
        found: TokenKind,
        offset: usize,
        context: &'static str,
    },

    /// A required `:`, `,`, `}` or `]` was not found.
    #[error("Expected {expected}, but got {found} at position {offset}")]
    MissingDelimiter {
        expected: &'static str,
        found: TokenKind,
        offset: usize,
    },

    /// A `,` was directly followed by the closing `}` or `]`.
    #[error("Trailing ',' before {found} at position {offset}")]
    TrailingComma { found: TokenKind, offset: usize },

    /// A string literal contains an escape sequence that cannot be decoded.
    #[error("Invalid escape sequence '{sequence}' in string at position {offset}")]
    InvalidEscape { sequence: String, offset: usize },

    /// A NUMBER token whose text is not a number. The token pattern rules
    /// this out, so seeing it means the token did not come from the tokenizer.
    #[error("Invalid number '{text}' at position {offset}")]
    InvalidNumber { text: String, offset: usize },

    /// Strict mode only: a character no token pattern accepts.
    #[error("Unrecognized character {ch:?} at position {offset}")]
    UnrecognizedCharacter { ch: char, offset: usize },

    /// Objects and arrays are nested deeper than the configured limit.
    #[error("Maximum nesting depth of {limit} exceeded at position {offset}")]
    NestingTooDeep { limit: usize, offset: usize },
}

impl ParseError {
    /// The byte offset the error refers to, if it refers to one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::NoTokens | ParseError::UnexpectedEndOfInput => None,
            ParseError::UnexpectedToken { offset, .. }
            | ParseError::MissingDelimiter { offset, .. }
            | ParseError::TrailingComma { offset, .. }
            | ParseError::InvalidEscape { offset, .. }
            | ParseError::InvalidNumber { offset, .. }
            | ParseError::UnrecognizedCharacter { offset, .. }
            | ParseError::NestingTooDeep { offset, .. } => Some(*offset),
        }
    }

    /// Resolves the error offset against `source` into a 1-indexed
    /// `(line, column)` pair. Columns count characters, not bytes.
    ///
    /// Returns `None` when the error has no offset or the offset does not
    /// fall on a character boundary of `source`.
    pub fn location(&self, source: &str) -> Option<(usize, usize)> {
        let offset = self.offset()?;
        let before = source.get(..offset)?;
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Some((line, column))
    }
}

/// The error type for file-based entry points.
///
/// Reading the file and parsing its contents fail distinctly, so callers
/// can tell a missing file apart from malformed DML.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file could not be opened or read, or was not valid UTF-8.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read but its contents are not valid DML.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
