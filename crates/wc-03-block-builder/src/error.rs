//! Error types for block building

use thiserror::Error;
use wc_02_chain::ChainError;

/// Result type alias for builder operations
pub type Result<T> = std::result::Result<T, BuilderError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// Caller's context was cancelled
    #[error("Operation cancelled")]
    Cancelled,

    /// Payload exceeds the configured size cap
    #[error("Message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// Preferred block lookup or block wrapping failed
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),
}

impl BuilderError {
    /// Errors the driver can shrug off and retry on the next round
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Cancelled | Self::MessageTooLarge { .. } => true,
            Self::Chain(e) => !e.is_fatal(),
        }
    }
}
