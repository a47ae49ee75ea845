use thiserror::Error;

use crate::lookahead::State;

/// The reason the reader rejected its input.
#[allow(missing_docs)]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("the document is empty")]
    EmptyDocument,
    #[error("unexpected character {:?}", byte_char(.0))]
    UnexpectedCharacter(u8),
    #[error("invalid literal")]
    InvalidLiteral,
    #[error("invalid number")]
    InvalidNumber,
    #[error("number out of range")]
    NumberOutOfRange,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscape(u32),
    #[error("unescaped control character in string")]
    ControlCharacter,
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("expected ':' after an object key")]
    ExpectedColon,
    #[error("expected a string key")]
    ExpectedKey,
    #[error("expected ',' or '}}'")]
    ExpectedCommaOrObjectEnd,
    #[error("expected ',' or ']'")]
    ExpectedCommaOrArrayEnd,
    #[error("maximum nesting depth of {0} exceeded")]
    DepthLimitExceeded(usize),
    #[error("unexpected content after the root value")]
    TrailingContent,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn byte_char(byte: &u8) -> char {
    char::from(*byte)
}

/// A [`SyntaxError`] together with the position of the token that caused it.
///
/// `offset` counts bytes from the start of the buffer; `line` and `column`
/// are 1-indexed, with columns counted in bytes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at {line}:{column}")]
pub struct ReaderError {
    /// What went wrong.
    pub kind: SyntaxError,
    /// Byte offset of the offending token.
    pub offset: usize,
    /// Line of the offending token.
    pub line: usize,
    /// Column of the offending token.
    pub column: usize,
}

/// Why a [`LookaheadParser`](crate::LookaheadParser) entered its error state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LookaheadError {
    /// The event source rejected the input.
    #[error("syntax error: {0}")]
    Syntax(#[from] ReaderError),
    /// A navigation call did not match the token under the cursor.
    #[error("expected {expected}, found {found}")]
    StructuralMismatch {
        /// What the call needed.
        expected: &'static str,
        /// What the lookahead held.
        found: State,
    },
    /// A getter did not match the value under the cursor.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the call needed.
        expected: &'static str,
        /// What the lookahead held.
        found: State,
    },
    /// The event source produced [`Event::RawNumber`](crate::Event::RawNumber).
    #[error("raw number tokens are not supported")]
    UnsupportedRawNumber,
}
