//! # Domain Errors
//!
//! Error types for the State Storage subsystem.
//!
//! ## Design Principles
//!
//! - Not-found conditions are distinct variants so callers can match on them
//! - Backend failures are carried as messages from the store adapter
//! - No panics in domain logic (use Result instead)

use shared_types::{BlockId, MessageId};
use thiserror::Error;

/// Errors that can occur reading or writing chain data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// No header is stored for this block hash.
    #[error("Block not found: {id}")]
    BlockNotFound { id: BlockId },

    /// No block is indexed at this height.
    #[error("No block at height {height}")]
    HeightNotFound { height: u64 },

    /// No payload is stored for this message.
    #[error("Message not found: {id}")]
    MessageNotFound { id: MessageId },

    /// The last-accepted pointer is absent; genesis was never initialised.
    #[error("Genesis not initialized: no last accepted block")]
    MissingGenesis,

    /// A stored value does not have the expected shape.
    #[error("Corrupted value under {key}: {reason}")]
    Corrupted { key: String, reason: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// Database I/O error.
    #[error("Database error: {message}")]
    DatabaseError { message: String },
}

impl StorageError {
    /// True for the lookup-miss variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BlockNotFound { .. } | Self::HeightNotFound { .. } | Self::MessageNotFound { .. }
        )
    }
}

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },
    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

impl From<KVStoreError> for StorageError {
    fn from(err: KVStoreError) -> Self {
        StorageError::DatabaseError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerializationError {
            message: err.to_string(),
        }
    }
}
