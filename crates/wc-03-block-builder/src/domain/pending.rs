//! # Pending Message Queue
//!
//! Insertion-ordered map of message id to payload.
//!
//! - `order`: FIFO of ids, one entry per distinct id
//! - `by_id`: payload lookup
//!
//! Re-adding an id replaces its payload in place; it keeps its original
//! position in the queue.

use shared_types::MessageId;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Default)]
pub struct PendingQueue {
    order: VecDeque<MessageId>,
    by_id: HashMap<MessageId, Vec<u8>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` was not queued before
    pub fn insert(&mut self, id: MessageId, bytes: Vec<u8>) -> bool {
        if self.by_id.insert(id, bytes).is_some() {
            return false;
        }
        self.order.push_back(id);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Remove up to `max` of the oldest entries
    pub fn drain(&mut self, max: usize) -> Vec<(MessageId, Vec<u8>)> {
        let count = max.min(self.order.len());
        let mut drained = Vec::with_capacity(count);
        for id in self.order.drain(..count) {
            if let Some(bytes) = self.by_id.remove(&id) {
                drained.push((id, bytes));
            }
        }
        drained
    }

    /// Put drained entries back at the head, preserving their order
    ///
    /// Ids re-added while the entries were out keep the newer payload and
    /// move to the restored position.
    pub fn restore(&mut self, entries: Vec<(MessageId, Vec<u8>)>) {
        for (id, bytes) in entries.into_iter().rev() {
            if self.by_id.contains_key(&id) {
                self.order.retain(|queued| *queued != id);
            } else {
                self.by_id.insert(id, bytes);
            }
            self.order.push_front(id);
        }
    }
}
