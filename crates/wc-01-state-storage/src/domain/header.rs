//! # Persisted Block Header
//!
//! The form in which accepted blocks are written to the durable store.
//! Encoded as JSON so fields added later can default when reading records
//! written by older versions.

use serde::{Deserialize, Serialize};
use shared_types::{BlockId, MessageId, Timestamp};
use std::collections::BTreeMap;

/// Block metadata stored by hash and indexed by height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    /// Block height.
    pub number: u64,
    /// Block hash (identity).
    pub hash: BlockId,
    /// Parent block hash.
    pub parent_hash: BlockId,
    /// Unix seconds.
    pub timestamp: Timestamp,
    /// Included message ids in inclusion order.
    #[serde(default)]
    pub messages: Vec<MessageId>,
    /// Full payload of every included message.
    #[serde(default)]
    pub message_bytes: BTreeMap<MessageId, Vec<u8>>,
}

impl BlockHeader {
    /// Encode for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a stored header.
    pub fn from_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}
