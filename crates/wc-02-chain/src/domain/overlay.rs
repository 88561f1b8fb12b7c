//! Copy-on-write state overlay
//!
//! An [`Overlay`] records writes made on top of a block's parent state
//! without touching it. Reads that miss the journal continue at the
//! [`OverlayBase`]: either the durable store or the overlay of a verified
//! ancestor, looked up by id in the chain arena.

use shared_types::BlockId;
use std::collections::BTreeMap;
use wc_01_state_storage::BatchOperation;

/// Where reads that miss an overlay go next
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayBase {
    /// The durable store (parent is the last accepted block)
    Durable,
    /// The overlay of a verified, not yet accepted parent
    Block(BlockId),
}

/// Journal of pending writes; `None` marks a deletion
#[derive(Clone, Debug)]
pub struct Overlay {
    base: OverlayBase,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl Overlay {
    pub fn new(base: OverlayBase) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> OverlayBase {
        self.base
    }

    /// Point reads at a different parent; pending writes are kept
    pub fn rebase(&mut self, base: OverlayBase) {
        self.base = base;
    }

    /// `Some(None)` if the key was deleted here, `None` if untouched
    pub fn lookup(&self, key: &[u8]) -> Option<Option<&[u8]>> {
        self.writes.get(key).map(|v| v.as_deref())
    }

    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
    }

    pub fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }

    /// Number of journaled keys
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Replay the journal as store operations
    pub fn to_batch(&self) -> Vec<BatchOperation> {
        self.writes
            .iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOperation::put(key.clone(), value.clone()),
                None => BatchOperation::delete(key.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Id;

    #[test]
    fn test_lookup_distinguishes_deleted_from_untouched() {
        let mut overlay = Overlay::new(OverlayBase::Durable);
        overlay.put(b"a", b"1");
        overlay.delete(b"b");

        assert_eq!(overlay.lookup(b"a"), Some(Some(&b"1"[..])));
        assert_eq!(overlay.lookup(b"b"), Some(None));
        assert_eq!(overlay.lookup(b"c"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut overlay = Overlay::new(OverlayBase::Durable);
        overlay.put(b"k", b"1");
        overlay.delete(b"k");
        overlay.put(b"k", b"2");
        assert_eq!(overlay.lookup(b"k"), Some(Some(&b"2"[..])));
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn test_batch_replays_journal() {
        let mut overlay = Overlay::new(OverlayBase::Durable);
        overlay.put(b"x", b"1");
        overlay.delete(b"y");

        let batch = overlay.to_batch();
        assert_eq!(
            batch,
            vec![BatchOperation::put(b"x", b"1"), BatchOperation::delete(b"y")]
        );
    }

    #[test]
    fn test_rebase_keeps_writes() {
        let mut overlay = Overlay::new(OverlayBase::Block(Id([3; 32])));
        overlay.put(b"k", b"v");
        overlay.rebase(OverlayBase::Durable);
        assert_eq!(overlay.base(), OverlayBase::Durable);
        assert!(!overlay.is_empty());
    }
}
