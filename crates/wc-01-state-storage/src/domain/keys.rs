//! # Key Layout
//!
//! Namespaces for everything the chain writes into the durable store.

use shared_types::{BlockId, MessageId};

/// Key namespace in the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Block header: `blockheader{hash}` -> JSON `BlockHeader`
    BlockHeader,
    /// Height index: `blockheight{height_be}` -> hash
    BlockHeight,
    /// Last accepted pointer: `lastaccepted` -> hash
    LastAccepted,
    /// Message payload: `message{id}` -> raw bytes
    Message,
    /// Message counter: `lastmsgid` -> u64 big-endian
    LastMessageId,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::BlockHeader => b"blockheader",
            KeyPrefix::BlockHeight => b"blockheight",
            KeyPrefix::LastAccepted => b"lastaccepted",
            KeyPrefix::Message => b"message",
            KeyPrefix::LastMessageId => b"lastmsgid",
        }
    }

    /// Build a full key with the given suffix.
    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix);
        key
    }

    /// Build a header key from a block hash.
    pub fn header_key(id: &BlockId) -> Vec<u8> {
        KeyPrefix::BlockHeader.key(id.as_bytes())
    }

    /// Build a height key from a block height.
    pub fn height_key(height: u64) -> Vec<u8> {
        KeyPrefix::BlockHeight.key(&height.to_be_bytes())
    }

    /// Build a message key from a message id.
    pub fn message_key(id: &MessageId) -> Vec<u8> {
        KeyPrefix::Message.key(id.as_bytes())
    }

    /// Get the last-accepted pointer key.
    pub fn last_accepted_key() -> Vec<u8> {
        KeyPrefix::LastAccepted.as_bytes().to_vec()
    }

    /// Get the message counter key.
    pub fn last_message_id_key() -> Vec<u8> {
        KeyPrefix::LastMessageId.as_bytes().to_vec()
    }
}
