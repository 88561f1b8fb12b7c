//! VM facade: one chain and one builder over a shared durable store

use crate::config::VmConfig;
use crate::error::VmError;
use shared_types::{BlockId, ChainState, MessageId};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use wc_01_state_storage::{KeyValueStore, TimeSource};
use wc_02_chain::{genesis, Block, BlockContext, Chain, ChainApi, ChainBlock, Genesis};
use wc_03_block_builder::{BlockBuilder, Event};

type Result<T> = std::result::Result<T, VmError>;

pub struct Vm {
    store: Arc<dyn KeyValueStore>,
    chain: Arc<Chain>,
    builder: Arc<BlockBuilder>,
}

impl Vm {
    /// Open the chain held in `store`, writing `genesis` first if it is empty
    pub fn initialize(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn TimeSource>,
        genesis: &Genesis,
        config: &VmConfig,
    ) -> Result<Self> {
        if genesis::is_initialized(&*store)? {
            info!("Existing chain found, skipping genesis");
        } else {
            genesis::initialize(&*store, genesis)?;
        }

        let chain = Arc::new(Chain::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            config.chain.clone(),
        )?);
        let builder = Arc::new(BlockBuilder::new(
            chain.clone(),
            clock,
            config.builder.clone(),
        ));
        builder.set_preference(chain.last_accepted());

        Ok(Self {
            store,
            chain,
            builder,
        })
    }

    pub fn chain(&self) -> &Arc<Chain> {
        &self.chain
    }

    pub fn builder(&self) -> &Arc<BlockBuilder> {
        &self.builder
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn last_accepted(&self) -> BlockId {
        self.chain.last_accepted()
    }

    pub fn set_state(&self, state: ChainState) {
        self.chain.set_chain_state(state);
    }

    pub fn set_preference(&self, id: BlockId) {
        self.builder.set_preference(id);
    }

    pub fn get_block(&self, id: &BlockId) -> Result<ChainBlock> {
        Ok(self.chain.get_block(id)?)
    }

    pub fn get_block_id_at_height(&self, height: u64) -> Result<BlockId> {
        Ok(self.chain.get_block_id_at_height(height)?)
    }

    /// Decode a block received from a peer
    pub fn parse_block(&self, bytes: &[u8]) -> Result<ChainBlock> {
        let block = Block::parse(bytes)?;
        Ok(self.chain.new_block(block)?)
    }

    pub fn build_block(&self, ctx: &CancellationToken) -> Result<ChainBlock> {
        self.build_block_with_context(ctx, None)
    }

    pub fn build_block_with_context(
        &self,
        ctx: &CancellationToken,
        block_context: Option<&BlockContext>,
    ) -> Result<ChainBlock> {
        Ok(self.builder.build_block(ctx, block_context)?)
    }

    pub fn add_message(&self, id: MessageId, bytes: Vec<u8>) -> Result<()> {
        Ok(self.builder.add_message(id, bytes)?)
    }

    pub async fn wait_for_event(&self, ctx: &CancellationToken) -> Result<Event> {
        Ok(self.builder.wait_for_event(ctx).await?)
    }
}
