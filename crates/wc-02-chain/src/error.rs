//! Error types for the chain subsystem

use shared_types::{BlockId, Timestamp};
use thiserror::Error;
use wc_01_state_storage::StorageError;

/// Result type alias for chain operations
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors that can occur while tracking, verifying or finalizing blocks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Parent is neither verified nor the last accepted block
    #[error("Missing parent block: {parent}")]
    MissingParent {
        /// Parent the block builds on
        parent: BlockId,
    },

    /// Height is not parent height + 1
    #[error("Wrong height: expected {expected}, got {got}")]
    WrongHeight {
        /// Parent height + 1
        expected: u64,
        /// Height carried by the block
        got: u64,
    },

    /// Timestamp too far ahead of local time
    #[error("Future timestamp: {timestamp} is more than {max_skew}s past local time {now}")]
    FutureTimestamp {
        /// Block timestamp
        timestamp: Timestamp,
        /// Local wall-clock time
        now: Timestamp,
        /// Tolerated skew in seconds
        max_skew: u64,
    },

    /// Timestamp earlier than the parent's
    #[error("Timestamp before parent: {timestamp} < {parent}")]
    TimestampBeforeParent {
        /// Block timestamp
        timestamp: Timestamp,
        /// Parent timestamp
        parent: Timestamp,
    },

    /// State requested for a block with no overlay that is not the tip
    #[error("Parent block has not been verified")]
    ParentNotVerified,

    /// A recorded verified child is absent from the arena
    #[error("Missing child block: {child}")]
    MissingChild {
        /// Child recorded under the accepted block
        child: BlockId,
    },

    /// No tracked or persisted block with this id
    #[error("Block not found: {id}")]
    BlockNotFound {
        /// Requested id
        id: BlockId,
    },

    /// Accept called on a block that was never verified
    #[error("Block {id} has not been verified")]
    NotVerified {
        /// Block id
        id: BlockId,
    },

    /// Accept called on a block whose parent is not the last accepted block
    #[error("Block {id} does not extend last accepted {last_accepted}")]
    OutOfOrderAccept {
        /// Block id
        id: BlockId,
        /// Current tip
        last_accepted: BlockId,
    },

    /// Reject called on the last accepted block
    #[error("Block {id} is already accepted")]
    AlreadyAccepted {
        /// Block id
        id: BlockId,
    },

    /// Caller's context was cancelled before the operation started
    #[error("Operation cancelled")]
    Cancelled,

    /// Bytes are not a valid block encoding
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Bytes decode but differ from the canonical re-encoding
    #[error("Non-canonical block encoding")]
    NonCanonicalEncoding,

    /// Durable store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ChainError {
    /// Block-validity failures; the driver rejects the candidate and moves on
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingParent { .. }
                | Self::WrongHeight { .. }
                | Self::FutureTimestamp { .. }
                | Self::TimestampBeforeParent { .. }
        )
    }

    /// Persistence and tree-corruption failures; the chain instance must halt
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::MissingChild { .. } => true,
            Self::Storage(e) => !e.is_not_found(),
            _ => false,
        }
    }

    /// Lookup misses
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::BlockNotFound { .. } => true,
            Self::Storage(e) => e.is_not_found(),
            _ => false,
        }
    }
}

impl From<wc_01_state_storage::KVStoreError> for ChainError {
    fn from(err: wc_01_state_storage::KVStoreError) -> Self {
        ChainError::Storage(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Id;

    #[test]
    fn test_error_classification() {
        assert!(ChainError::WrongHeight { expected: 2, got: 3 }.is_validation());
        assert!(ChainError::MissingParent { parent: Id::EMPTY }.is_validation());
        assert!(!ChainError::ParentNotVerified.is_validation());

        assert!(ChainError::MissingChild { child: Id::EMPTY }.is_fatal());
        assert!(ChainError::Storage(StorageError::DatabaseError {
            message: "io".into()
        })
        .is_fatal());
        assert!(!ChainError::Storage(StorageError::BlockNotFound { id: Id::EMPTY }).is_fatal());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(ChainError::BlockNotFound { id: Id::EMPTY }.is_not_found());
        assert!(ChainError::Storage(StorageError::HeightNotFound { height: 1 }).is_not_found());
        assert!(!ChainError::Cancelled.is_not_found());
    }
}
