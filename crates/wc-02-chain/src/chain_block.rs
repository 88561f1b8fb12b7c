//! Per-block lifecycle: verify, accept, reject
//!
//! ```text
//! Unverified ──verify──▶ Verified ──accept──▶ Accepted
//!      │                    │
//!      └──────reject────────┴──reject──▶ Rejected
//! ```

use crate::chain::{ChainInner, TrackedBlock};
use crate::domain::{Block, BlockContext, OverlayBase, SealedBlock};
use crate::error::{ChainError, Result};
use crate::state_view::StateView;
use shared_types::{BlockId, Timestamp};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wc_01_state_storage::{
    block_header_ops, get_last_message_id, last_accepted_op, last_message_id_op, message_op,
    KeyPrefix,
};

/// Where a block sits in its lifecycle, as far as this node can tell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    /// Known but not (or no longer) tracked as verified
    Unverified,
    /// Holding an overlay on top of its parent
    Verified,
    /// Finalized and persisted
    Accepted,
}

fn check_cancelled(ctx: &CancellationToken) -> Result<()> {
    if ctx.is_cancelled() {
        return Err(ChainError::Cancelled);
    }
    Ok(())
}

/// Handle to one block, bound to the chain that created it
#[derive(Clone)]
pub struct ChainBlock {
    chain: Arc<ChainInner>,
    sealed: Arc<SealedBlock>,
}

impl std::fmt::Debug for ChainBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainBlock")
            .field("id", &self.sealed.id())
            .field("height", &self.height())
            .finish()
    }
}

impl ChainBlock {
    pub(crate) fn new(chain: Arc<ChainInner>, sealed: Arc<SealedBlock>) -> Self {
        Self { chain, sealed }
    }

    pub fn id(&self) -> BlockId {
        self.sealed.id()
    }

    pub fn parent(&self) -> BlockId {
        self.sealed.block().parent_id
    }

    pub fn bytes(&self) -> &[u8] {
        self.sealed.bytes()
    }

    pub fn height(&self) -> u64 {
        self.sealed.block().height
    }

    pub fn timestamp(&self) -> Timestamp {
        self.sealed.block().timestamp
    }

    /// Decoded block content
    pub fn block(&self) -> &Block {
        self.sealed.block()
    }

    /// Verify without a consensus-supplied context
    pub fn verify(&self, ctx: &CancellationToken) -> Result<()> {
        self.verify_with_context(ctx, None)
    }

    /// This block never needs a [`BlockContext`] to verify
    pub fn should_verify_with_context(&self) -> bool {
        false
    }

    /// Check the block against its parent and start tracking it
    ///
    /// Checks, in order: timestamp skew, parent presence, height, timestamp
    /// monotonicity. Re-verifying a tracked block or the tip is a no-op.
    pub fn verify_with_context(
        &self,
        ctx: &CancellationToken,
        _block_context: Option<&BlockContext>,
    ) -> Result<()> {
        check_cancelled(ctx)?;

        let id = self.id();
        let block = self.block();
        let mut index = self.chain.index.write();

        if index.has_state(&id) {
            debug!("[wc-02] Block {} already verified", id);
            return Ok(());
        }

        let now = self.chain.clock.now();
        let max_skew = self.chain.config.max_clock_skew_secs;
        if block.timestamp > now.saturating_add(max_skew) {
            return Err(ChainError::FutureTimestamp {
                timestamp: block.timestamp,
                now,
                max_skew,
            });
        }

        let parent_id = block.parent_id;
        if !index.has_state(&parent_id) {
            return Err(ChainError::MissingParent { parent: parent_id });
        }
        let parent = index
            .blocks
            .get(&parent_id)
            .ok_or(ChainError::MissingParent { parent: parent_id })?
            .block
            .block();

        let expected = parent.height.saturating_add(1);
        if block.height != expected {
            return Err(ChainError::WrongHeight {
                expected,
                got: block.height,
            });
        }
        if block.timestamp < parent.timestamp {
            return Err(ChainError::TimestampBeforeParent {
                timestamp: block.timestamp,
                parent: parent.timestamp,
            });
        }

        let base = if parent_id == index.last_accepted {
            OverlayBase::Durable
        } else {
            OverlayBase::Block(parent_id)
        };
        index
            .blocks
            .insert(id, TrackedBlock::verified(Arc::clone(&self.sealed), base));
        if let Some(parent) = index.blocks.get_mut(&parent_id) {
            parent.verified_children.insert(id);
        }

        info!(
            "[wc-02] Verified block {} at height {} ({} messages)",
            id,
            block.height,
            block.messages.len()
        );
        Ok(())
    }

    /// Finalize this block
    ///
    /// Everything the block changed is written in one batch: its overlay,
    /// its messages, header and height index, the last-accepted pointer and
    /// the message counter. A failed write leaves memory untouched and must
    /// be treated as fatal by the caller.
    pub fn accept(&self, ctx: &CancellationToken) -> Result<()> {
        check_cancelled(ctx)?;

        let id = self.id();
        let block = self.block();
        let mut index = self.chain.index.write();

        if id == index.last_accepted {
            debug!("[wc-02] Block {} already accepted", id);
            return Ok(());
        }
        if block.parent_id != index.last_accepted {
            return Err(ChainError::OutOfOrderAccept {
                id,
                last_accepted: index.last_accepted,
            });
        }

        let tracked = index.blocks.get(&id).ok_or(ChainError::NotVerified { id })?;
        let overlay = tracked
            .overlay
            .as_ref()
            .ok_or(ChainError::NotVerified { id })?;

        let children: Vec<BlockId> = tracked.verified_children.iter().copied().collect();
        if let Some(child) = children.iter().find(|c| !index.blocks.contains_key(*c)) {
            return Err(ChainError::MissingChild { child: *child });
        }

        let mut batch = overlay.to_batch();
        let overlay_writes = batch.len();
        for message_id in &block.messages {
            match block.message_bytes.get(message_id) {
                Some(bytes) => batch.push(message_op(message_id, bytes)),
                None => warn!(
                    "[wc-02] Block {} lists message {} without bytes, skipping",
                    id, message_id
                ),
            }
        }
        batch.extend(block_header_ops(&block.to_header(id))?);
        batch.push(last_accepted_op(&id));
        if !block.messages.is_empty() {
            let counter = get_last_message_id(&*self.chain.store)?;
            batch.push(last_message_id_op(
                counter.saturating_add(block.messages.len() as u64),
            ));
        }

        self.chain.store.atomic_batch_write(batch)?;

        for child in &children {
            if let Some(overlay) = index.blocks.get_mut(child).and_then(|c| c.overlay.as_mut()) {
                overlay.rebase(OverlayBase::Durable);
            }
        }
        if let Some(tracked) = index.blocks.get_mut(&id) {
            tracked.overlay = None;
        }
        index.blocks.remove(&block.parent_id);
        index.last_accepted = id;

        info!(
            "[wc-02] Accepted block {} at height {} ({} state writes, {} messages, {} children)",
            id,
            block.height,
            overlay_writes,
            block.messages.len(),
            children.len()
        );
        Ok(())
    }

    /// Drop this block from the candidate set
    ///
    /// Descendants are left in place; their state becomes unreadable once the
    /// chain moves past them.
    pub fn reject(&self, ctx: &CancellationToken) -> Result<()> {
        check_cancelled(ctx)?;

        let id = self.id();
        let mut index = self.chain.index.write();
        if id == index.last_accepted {
            return Err(ChainError::AlreadyAccepted { id });
        }

        let Some(removed) = index.blocks.remove(&id) else {
            debug!("[wc-02] Rejected untracked block {}", id);
            return Ok(());
        };
        if let Some(parent) = index.blocks.get_mut(&self.parent()) {
            parent.verified_children.remove(&id);
        }

        info!(
            "[wc-02] Rejected block {} at height {} ({} descendants orphaned)",
            id,
            self.height(),
            removed.verified_children.len()
        );
        Ok(())
    }

    /// State as of this block: its own writes over its parent's
    pub fn state(&self) -> Result<StateView> {
        let id = self.id();
        if !self.chain.index.read().has_state(&id) {
            return Err(ChainError::ParentNotVerified);
        }
        Ok(StateView::new(Arc::clone(&self.chain), id))
    }

    pub fn status(&self) -> Result<BlockStatus> {
        let id = self.id();
        {
            let index = self.chain.index.read();
            if id == index.last_accepted {
                return Ok(BlockStatus::Accepted);
            }
            if index.has_state(&id) {
                return Ok(BlockStatus::Verified);
            }
        }
        if self
            .chain
            .store
            .exists(&KeyPrefix::BlockHeader.key(id.as_bytes()))?
        {
            return Ok(BlockStatus::Accepted);
        }
        Ok(BlockStatus::Unverified)
    }
}
