//! PHP serialize decoder error type.

use thiserror::Error;

/// Structural decode failures, each carrying the byte offset of the
/// offending input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PhpDecodeError {
    #[error("unknown type tag 0x{tag:02x} at position {pos}")]
    UnknownTag { tag: u8, pos: usize },
    #[error("unexpected end of input at position {0}")]
    Truncated(usize),
    #[error("malformed length prefix at position {0}")]
    MalformedLength(usize),
    #[error("malformed numeric payload at position {0}")]
    MalformedNumber(usize),
    #[error("nesting depth limit exceeded at position {0}")]
    TooDeep(usize),
}
