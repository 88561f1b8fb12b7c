//! Inbound ports (driving side - API)

use crate::chain_block::ChainBlock;
use crate::domain::Block;
use crate::error::Result;
use shared_types::{BlockId, ChainState};

/// Primary port: what the consensus driver and the block builder see of the chain
pub trait ChainApi: Send + Sync {
    /// Current finalized tip
    fn last_accepted(&self) -> BlockId;

    /// Record the driver's lifecycle phase
    fn set_chain_state(&self, state: ChainState);

    /// Tracked wrapper if present, otherwise reloaded from the durable store
    fn get_block(&self, id: &BlockId) -> Result<ChainBlock>;

    /// Wrap a parsed or freshly built block; returns the tracked wrapper
    /// when one with the same identity already exists
    fn new_block(&self, block: Block) -> Result<ChainBlock>;
}
