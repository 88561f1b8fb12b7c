//! Genesis bootstrap
//!
//! The genesis block is a height-0 block with an empty parent and no
//! messages. Its id is the hash of its canonical encoding, like any other
//! block.

use crate::domain::Block;
use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};
use shared_types::{BlockId, Timestamp};
use tracing::info;
use wc_01_state_storage::{
    block_header_ops, get_last_accepted_block_id, last_accepted_op, KeyValueStore,
};

/// Genesis parameters as supplied by the host
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Genesis {
    /// Unix seconds
    pub timestamp: Timestamp,
}

impl Genesis {
    /// Parse genesis JSON; empty input yields the default genesis
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes).map_err(|e| ChainError::Encoding(e.to_string()))
    }

    pub fn block(&self) -> Block {
        Block::genesis(self.timestamp)
    }

    pub fn id(&self) -> Result<BlockId> {
        self.block().id()
    }
}

/// Whether `store` already holds an accepted chain
pub fn is_initialized<S: KeyValueStore + ?Sized>(store: &S) -> Result<bool> {
    Ok(get_last_accepted_block_id(store)?.is_some())
}

/// Persist the genesis block as the accepted tip
pub fn initialize<S: KeyValueStore + ?Sized>(store: &S, genesis: &Genesis) -> Result<BlockId> {
    let block = genesis.block();
    let id = block.id()?;

    let mut batch = block_header_ops(&block.to_header(id))?;
    batch.push(last_accepted_op(&id));
    store.atomic_batch_write(batch)?;

    info!(
        "[wc-02] Genesis block {} written (timestamp {})",
        id, genesis.timestamp
    );
    Ok(id)
}
