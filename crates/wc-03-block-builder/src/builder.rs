//! Block builder service

use crate::config::BuilderConfig;
use crate::domain::PendingQueue;
use crate::error::{BuilderError, Result};
use crate::events::Event;
use parking_lot::{Mutex, RwLock};
use shared_types::{BlockId, MessageId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wc_01_state_storage::TimeSource;
use wc_02_chain::{Block, BlockContext, ChainApi, ChainBlock};

/// Assembles candidate blocks from pending messages
///
/// `add_message` may be called from any task; the driver alone calls
/// `set_preference`, `wait_for_event` and `build_block`.
pub struct BlockBuilder {
    chain: Arc<dyn ChainApi>,
    clock: Arc<dyn TimeSource>,
    config: BuilderConfig,
    preference: RwLock<BlockId>,
    pending: Mutex<PendingQueue>,
    notify: Notify,
}

impl BlockBuilder {
    /// Create a builder that initially extends the chain's last accepted block
    ///
    /// A `max_messages_per_block` of 0 is raised to 1; with no room for
    /// messages every build would leave the queue, and every waiter, stuck.
    pub fn new(
        chain: Arc<dyn ChainApi>,
        clock: Arc<dyn TimeSource>,
        mut config: BuilderConfig,
    ) -> Self {
        if config.max_messages_per_block == 0 {
            warn!("[wc-03] max_messages_per_block is 0, using 1");
            config.max_messages_per_block = 1;
        }
        let preference = chain.last_accepted();
        info!(
            "[wc-03] Block builder ready (preference {}, max {} messages per block)",
            preference, config.max_messages_per_block
        );
        Self {
            chain,
            clock,
            config,
            preference: RwLock::new(preference),
            pending: Mutex::new(PendingQueue::new()),
            notify: Notify::new(),
        }
    }

    /// Block the next `build_block` extends; not checked against the chain
    pub fn set_preference(&self, id: BlockId) {
        debug!("[wc-03] Preference set to {}", id);
        *self.preference.write() = id;
    }

    pub fn preference(&self) -> BlockId {
        *self.preference.read()
    }

    /// Queue a message and wake every waiter
    ///
    /// Re-adding a queued id replaces its payload without moving it.
    pub fn add_message(&self, id: MessageId, bytes: Vec<u8>) -> Result<()> {
        if bytes.len() > self.config.max_message_size {
            return Err(BuilderError::MessageTooLarge {
                size: bytes.len(),
                max: self.config.max_message_size,
            });
        }

        let size = bytes.len();
        let (is_new, pending) = {
            let mut queue = self.pending.lock();
            let is_new = queue.insert(id, bytes);
            (is_new, queue.len())
        };
        debug!(
            "[wc-03] Message {} queued ({} bytes, new: {}, pending: {})",
            id, size, is_new, pending
        );

        self.notify.notify_waiters();
        Ok(())
    }

    /// Return the messages of a block that will not be accepted to the head
    /// of the queue, in the block's order
    pub fn requeue(&self, block: &Block) {
        let entries: Vec<(MessageId, Vec<u8>)> = block
            .messages
            .iter()
            .filter_map(|id| block.message_bytes.get(id).map(|b| (*id, b.clone())))
            .collect();
        if entries.is_empty() {
            return;
        }

        let count = entries.len();
        self.pending.lock().restore(entries);
        debug!("[wc-03] Requeued {} messages", count);
        self.notify.notify_waiters();
    }

    /// Number of messages waiting for a block
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Suspend until at least one message is pending or `ctx` is cancelled
    pub async fn wait_for_event(&self, ctx: &CancellationToken) -> Result<Event> {
        loop {
            // Register before checking the queue so an add that lands in
            // between still wakes us.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let has_pending = !self.pending.lock().is_empty();
            if has_pending {
                return Ok(Event::PendingMessages);
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = ctx.cancelled() => return Err(BuilderError::Cancelled),
            }
        }
    }

    /// Build a block on top of the preferred block
    ///
    /// The timestamp is `max(now, parent.timestamp)`. Up to
    /// `max_messages_per_block` of the oldest pending messages are moved into
    /// the block; the rest stay queued. `block_context` is not consulted.
    pub fn build_block(
        &self,
        ctx: &CancellationToken,
        _block_context: Option<&BlockContext>,
    ) -> Result<ChainBlock> {
        if ctx.is_cancelled() {
            return Err(BuilderError::Cancelled);
        }

        let parent_id = self.preference();
        let parent = self.chain.get_block(&parent_id)?;
        let timestamp = self.clock.now().max(parent.timestamp());

        let drained = self
            .pending
            .lock()
            .drain(self.config.max_messages_per_block);

        let mut messages = Vec::with_capacity(drained.len());
        let mut message_bytes = BTreeMap::new();
        for (id, bytes) in &drained {
            messages.push(*id);
            message_bytes.insert(*id, bytes.clone());
        }

        let block = Block {
            parent_id,
            height: parent.height() + 1,
            timestamp,
            messages,
            message_bytes,
        };

        match self.chain.new_block(block) {
            Ok(built) => {
                info!(
                    "[wc-03] Built block {} at height {} on {} ({} messages, {} still pending)",
                    built.id(),
                    built.height(),
                    parent_id,
                    drained.len(),
                    self.pending_len()
                );
                Ok(built)
            }
            Err(e) => {
                self.pending.lock().restore(drained);
                Err(e.into())
            }
        }
    }
}
