//! # Error Types
//!
//! Errors produced while handling shared value types.

use thiserror::Error;

/// Errors that can occur when decoding an [`Id`](crate::Id).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Input was not valid hexadecimal.
    #[error("Invalid hex identifier: {0}")]
    InvalidHex(String),

    /// Input decoded to the wrong number of bytes.
    #[error("Invalid identifier length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}
