//! Error types for the tokenizer and the query layer
//!
//! Parse failures fall into two classes: capacity exhaustion, which the
//! caller recovers from by growing the token array and calling
//! [`Parser::parse`](crate::Parser::parse) again, and malformed input, which
//! ends the session. Every variant carries the byte position of the failing
//! construct; the parser restores its position to that byte before
//! returning.

use thiserror::Error;

/// Tokenizer failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token array is full. Grow it (preserving the filled prefix) and
    /// call `parse` again with the same parser state to resume.
    #[error("token array full at byte {pos}")]
    CapacityExhausted { pos: usize },

    /// A `\` escape inside a quoted string named a byte outside the
    /// supported set (`" / \ b f r n t`).
    #[error("invalid escape sequence in string starting at byte {pos}")]
    BadEscape { pos: usize },

    /// Input (or a NUL byte) ended before the closing quote.
    #[error("unterminated quoted string starting at byte {pos}")]
    UnterminatedString { pos: usize },

    /// An unquoted identifier contained a byte outside printable ASCII.
    #[error("invalid identifier byte at {pos}")]
    InvalidByte { pos: usize },

    /// A required literal (`?>`, `-->`, `>`, `=`) was not found before the
    /// end of input.
    #[error("expected `{literal}` not found from byte {pos}")]
    LiteralNotFound { literal: &'static str, pos: usize },

    /// A close (`/` or `</`) with no tokens allocated, or whose unresolved-
    /// token walk landed on something that is not an Object.
    #[error("close without matching open at byte {pos}")]
    UnmatchedClose { pos: usize },

    /// Input ended in the middle of a construct (`<` as the final byte,
    /// whitespace running off the end of an attribute list, ...).
    #[error("unexpected end of input at byte {pos}")]
    UnexpectedEof { pos: usize },

    /// Byte offsets are `u32` with `u32::MAX` reserved as the "unset"
    /// sentinel; sources that long cannot be addressed.
    #[error("source length {len} exceeds addressable range")]
    SourceTooLarge { len: usize },
}

impl ParseError {
    /// Whether the session can continue via the grow-and-resume protocol.
    /// Everything except [`ParseError::CapacityExhausted`] is fatal.
    #[inline]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, ParseError::CapacityExhausted { .. })
    }
}

/// Failure of [`TokenView::copy_text`](crate::TokenView::copy_text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CopyError {
    /// The token index is out of range of the view.
    #[error("token index out of range")]
    InvalidIndex,

    /// The destination was smaller than the span. `written` bytes of the
    /// span were copied, followed by a 0 terminator.
    #[error("destination buffer truncated after {written} bytes")]
    Truncated { written: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(ParseError::CapacityExhausted { pos: 0 }.is_recoverable());
        assert!(!ParseError::BadEscape { pos: 0 }.is_recoverable());
        assert!(!ParseError::UnterminatedString { pos: 0 }.is_recoverable());
        assert!(!ParseError::InvalidByte { pos: 0 }.is_recoverable());
        assert!(!ParseError::LiteralNotFound { literal: ">", pos: 0 }.is_recoverable());
        assert!(!ParseError::UnmatchedClose { pos: 0 }.is_recoverable());
        assert!(!ParseError::UnexpectedEof { pos: 0 }.is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = ParseError::LiteralNotFound { literal: "-->", pos: 7 };
        assert_eq!(err.to_string(), "expected `-->` not found from byte 7");
    }
}
