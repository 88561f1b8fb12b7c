//! Chain: the finalized tip plus an arena of verified candidate blocks
//!
//! Parent/child links are block ids looked up in [`BlockIndex::blocks`],
//! never references, so accepting a block only rewires keys.

use crate::chain_block::ChainBlock;
use crate::config::ChainConfig;
use crate::domain::{Block, Overlay, OverlayBase, SealedBlock};
use crate::error::{ChainError, Result};
use crate::ports::ChainApi;
use parking_lot::RwLock;
use shared_types::{BlockId, ChainState};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};
use wc_01_state_storage::{
    get_block_header, get_block_id_by_height, get_last_accepted_block_id, KeyValueStore,
    StorageError, TimeSource,
};

/// One entry in the arena
pub(crate) struct TrackedBlock {
    pub(crate) block: Arc<SealedBlock>,
    /// Present while verified; `None` for the accepted tip
    pub(crate) overlay: Option<Overlay>,
    pub(crate) verified_children: HashSet<BlockId>,
}

impl TrackedBlock {
    pub(crate) fn accepted(block: Arc<SealedBlock>) -> Self {
        Self {
            block,
            overlay: None,
            verified_children: HashSet::new(),
        }
    }

    pub(crate) fn verified(block: Arc<SealedBlock>, base: OverlayBase) -> Self {
        Self {
            block,
            overlay: Some(Overlay::new(base)),
            verified_children: HashSet::new(),
        }
    }
}

/// In-memory tree rooted at the last accepted block
pub(crate) struct BlockIndex {
    pub(crate) last_accepted: BlockId,
    pub(crate) chain_state: ChainState,
    pub(crate) blocks: HashMap<BlockId, TrackedBlock>,
}

impl BlockIndex {
    /// True for the tip and for blocks holding an overlay
    pub(crate) fn has_state(&self, id: &BlockId) -> bool {
        *id == self.last_accepted
            || self
                .blocks
                .get(id)
                .is_some_and(|b| b.overlay.is_some())
    }

    /// Resolve `key` as seen by block `from`, walking overlays towards the tip
    pub(crate) fn read(
        &self,
        store: &dyn KeyValueStore,
        from: BlockId,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        let mut cursor = from;
        loop {
            if cursor == self.last_accepted {
                return Ok(store.get(key)?);
            }
            let overlay = self
                .blocks
                .get(&cursor)
                .and_then(|b| b.overlay.as_ref())
                .ok_or(ChainError::ParentNotVerified)?;
            if let Some(value) = overlay.lookup(key) {
                return Ok(value.map(<[u8]>::to_vec));
            }
            match overlay.base() {
                OverlayBase::Durable => return Ok(store.get(key)?),
                OverlayBase::Block(parent) => cursor = parent,
            }
        }
    }

    pub(crate) fn overlay_mut(&mut self, id: &BlockId) -> Result<&mut Overlay> {
        self.blocks
            .get_mut(id)
            .and_then(|b| b.overlay.as_mut())
            .ok_or(ChainError::ParentNotVerified)
    }
}

/// Shared state behind [`Chain`] and every [`ChainBlock`] handle
pub(crate) struct ChainInner {
    pub(crate) store: Arc<dyn KeyValueStore>,
    pub(crate) clock: Arc<dyn TimeSource>,
    pub(crate) config: ChainConfig,
    pub(crate) index: RwLock<BlockIndex>,
}

/// Block lifecycle manager
///
/// The consensus driver is expected to serialize verify/accept/reject calls;
/// the internal lock only keeps readers such as the block builder consistent.
#[derive(Clone)]
pub struct Chain {
    inner: Arc<ChainInner>,
}

impl Chain {
    /// Load the last accepted block from `store` and start tracking it
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn TimeSource>,
        config: ChainConfig,
    ) -> Result<Self> {
        let last_accepted =
            get_last_accepted_block_id(&*store)?.ok_or(StorageError::MissingGenesis)?;
        let header = get_block_header(&*store, &last_accepted)?;
        let tip = Arc::new(SealedBlock::with_id(
            last_accepted,
            Block::from_header(&header),
        )?);

        info!(
            "[wc-02] Chain initialized at height {} (last accepted {})",
            header.number, last_accepted
        );

        let mut blocks = HashMap::new();
        blocks.insert(last_accepted, TrackedBlock::accepted(tip));

        Ok(Self {
            inner: Arc::new(ChainInner {
                store,
                clock,
                config,
                index: RwLock::new(BlockIndex {
                    last_accepted,
                    chain_state: ChainState::default(),
                    blocks,
                }),
            }),
        })
    }

    /// Last lifecycle phase reported by the driver
    pub fn chain_state(&self) -> ChainState {
        self.inner.index.read().chain_state
    }

    /// Id of the accepted block at `height`
    pub fn get_block_id_at_height(&self, height: u64) -> Result<BlockId> {
        Ok(get_block_id_by_height(&*self.inner.store, height)?)
    }

    /// Number of blocks held in the arena, the tip included
    pub fn tracked_len(&self) -> usize {
        self.inner.index.read().blocks.len()
    }

    /// Whether `id` is held in the arena
    pub fn is_tracked(&self, id: &BlockId) -> bool {
        self.inner.index.read().blocks.contains_key(id)
    }

    pub fn config(&self) -> &ChainConfig {
        &self.inner.config
    }
}

impl ChainApi for Chain {
    fn last_accepted(&self) -> BlockId {
        self.inner.index.read().last_accepted
    }

    fn set_chain_state(&self, state: ChainState) {
        debug!("[wc-02] Chain state set to {:?}", state);
        self.inner.index.write().chain_state = state;
    }

    fn get_block(&self, id: &BlockId) -> Result<ChainBlock> {
        if let Some(tracked) = self.inner.index.read().blocks.get(id) {
            return Ok(ChainBlock::new(
                Arc::clone(&self.inner),
                Arc::clone(&tracked.block),
            ));
        }

        let header = get_block_header(&*self.inner.store, id).map_err(|e| match e {
            StorageError::BlockNotFound { id } => ChainError::BlockNotFound { id },
            other => other.into(),
        })?;
        let sealed = SealedBlock::with_id(*id, Block::from_header(&header))?;
        Ok(ChainBlock::new(Arc::clone(&self.inner), Arc::new(sealed)))
    }

    fn new_block(&self, block: Block) -> Result<ChainBlock> {
        let sealed = SealedBlock::seal(block)?;
        if let Some(tracked) = self.inner.index.read().blocks.get(&sealed.id()) {
            return Ok(ChainBlock::new(
                Arc::clone(&self.inner),
                Arc::clone(&tracked.block),
            ));
        }
        Ok(ChainBlock::new(Arc::clone(&self.inner), Arc::new(sealed)))
    }
}
