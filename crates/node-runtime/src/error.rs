//! Node-level errors

use thiserror::Error;
use wc_02_chain::ChainError;
use wc_03_block_builder::BuilderError;

#[derive(Debug, Error)]
pub enum VmError {
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Builder error: {0}")]
    Builder(#[from] BuilderError),
}

impl VmError {
    /// The caller's token was cancelled somewhere along the way
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Chain(ChainError::Cancelled)
                | Self::Builder(BuilderError::Cancelled)
                | Self::Builder(BuilderError::Chain(ChainError::Cancelled))
        )
    }

    /// The node must stop driving this chain
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Chain(e) | Self::Builder(BuilderError::Chain(e)) => e.is_fatal(),
            Self::Builder(_) => false,
        }
    }
}
