//! Block entity and canonical encoding

use crate::error::{ChainError, Result};
use bincode::Options;
use serde::{Deserialize, Serialize};
use shared_types::{hash256, BlockId, MessageId, Timestamp};
use std::collections::BTreeMap;
use wc_01_state_storage::BlockHeader;

/// Upper bound on an encoded block (100 messages of 256 KiB plus framing)
pub const MAX_BLOCK_BYTES: u64 = 32 * 1024 * 1024;

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_BLOCK_BYTES)
}

/// One block's content
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Parent block id
    pub parent_id: BlockId,

    /// Block number (parent height + 1)
    pub height: u64,

    /// Unix seconds
    pub timestamp: Timestamp,

    /// Included message ids in inclusion order
    pub messages: Vec<MessageId>,

    /// Payload of every included message
    pub message_bytes: BTreeMap<MessageId, Vec<u8>>,
}

impl Block {
    /// The height-0 block
    pub fn genesis(timestamp: Timestamp) -> Self {
        Self {
            parent_id: BlockId::EMPTY,
            height: 0,
            timestamp,
            messages: Vec::new(),
            message_bytes: BTreeMap::new(),
        }
    }

    /// Canonical encoding
    pub fn bytes(&self) -> Result<Vec<u8>> {
        codec()
            .serialize(self)
            .map_err(|e| ChainError::Encoding(e.to_string()))
    }

    /// Hash of the canonical encoding
    pub fn id(&self) -> Result<BlockId> {
        Ok(hash256(&self.bytes()?))
    }

    /// Decode a block, rejecting any encoding that is not canonical
    pub fn parse(data: &[u8]) -> Result<Self> {
        let block: Block = codec()
            .deserialize(data)
            .map_err(|e| ChainError::Encoding(e.to_string()))?;
        if block.bytes()? != data {
            return Err(ChainError::NonCanonicalEncoding);
        }
        Ok(block)
    }

    /// Rebuild from a persisted header
    pub fn from_header(header: &BlockHeader) -> Self {
        Self {
            parent_id: header.parent_hash,
            height: header.number,
            timestamp: header.timestamp,
            messages: header.messages.clone(),
            message_bytes: header.message_bytes.clone(),
        }
    }

    /// Persisted form under `id`
    pub fn to_header(&self, id: BlockId) -> BlockHeader {
        BlockHeader {
            number: self.height,
            hash: id,
            parent_hash: self.parent_id,
            timestamp: self.timestamp,
            messages: self.messages.clone(),
            message_bytes: self.message_bytes.clone(),
        }
    }
}

/// A block with its identity and encoding computed once
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedBlock {
    id: BlockId,
    bytes: Vec<u8>,
    block: Block,
}

impl SealedBlock {
    /// Encode and hash `block`
    pub fn seal(block: Block) -> Result<Self> {
        let bytes = block.bytes()?;
        Ok(Self {
            id: hash256(&bytes),
            bytes,
            block,
        })
    }

    /// Seal under a known id (blocks reloaded from the durable store)
    pub fn with_id(id: BlockId, block: Block) -> Result<Self> {
        let bytes = block.bytes()?;
        Ok(Self { id, bytes, block })
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn block(&self) -> &Block {
        &self.block
    }
}

/// Extra context a consensus engine may supply when building or verifying
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockContext {
    /// Height of the coordinating chain the block was proposed against
    pub p_chain_height: u64,
}
