//! Per-block key/value view

use crate::chain::ChainInner;
use crate::error::Result;
use shared_types::BlockId;
use std::sync::Arc;

/// Reads resolve through the block's overlay chain down to the durable
/// store; writes land in the block's own overlay. For the accepted tip both
/// go straight to the durable store.
#[derive(Clone)]
pub struct StateView {
    chain: Arc<ChainInner>,
    id: BlockId,
}

impl StateView {
    pub(crate) fn new(chain: Arc<ChainInner>, id: BlockId) -> Self {
        Self { chain, id }
    }

    /// Block this view belongs to
    pub fn block_id(&self) -> BlockId {
        self.id
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.chain
            .index
            .read()
            .read(&*self.chain.store, self.id, key)
    }

    pub fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut index = self.chain.index.write();
        if self.id == index.last_accepted {
            return Ok(self.chain.store.put(key, value)?);
        }
        index.overlay_mut(&self.id)?.put(key, value);
        Ok(())
    }

    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let mut index = self.chain.index.write();
        if self.id == index.last_accepted {
            return Ok(self.chain.store.delete(key)?);
        }
        index.overlay_mut(&self.id)?.delete(key);
        Ok(())
    }

    /// Number of uncommitted writes held for this block
    pub fn pending_writes(&self) -> usize {
        self.chain
            .index
            .read()
            .blocks
            .get(&self.id)
            .and_then(|b| b.overlay.as_ref())
            .map_or(0, |o| o.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::ports::ChainApi;
    use crate::test_utils::{child_of, new_chain};
    use tokio_util::sync::CancellationToken;
    use wc_01_state_storage::KeyValueStore;

    #[test]
    fn test_pending_writes_counts_overlay() {
        let (chain, _store, _clock) = new_chain(10);
        let genesis = chain.get_block(&chain.last_accepted()).unwrap();
        let b1 = chain.new_block(child_of(&genesis, 10)).unwrap();
        b1.verify(&CancellationToken::new()).unwrap();

        let view = b1.state().unwrap();
        assert_eq!(view.block_id(), b1.id());
        view.put(b"a", b"1").unwrap();
        view.put(b"a", b"2").unwrap();
        view.delete(b"b").unwrap();
        assert_eq!(view.pending_writes(), 2);
        assert_eq!(genesis.state().unwrap().pending_writes(), 0);
    }

    #[test]
    fn test_view_outlives_accept() {
        let (chain, store, _clock) = new_chain(10);
        let ctx = CancellationToken::new();
        let genesis = chain.get_block(&chain.last_accepted()).unwrap();
        let b1 = chain.new_block(child_of(&genesis, 10)).unwrap();
        b1.verify(&ctx).unwrap();
        let view = b1.state().unwrap();
        view.put(b"a", b"1").unwrap();

        b1.accept(&ctx).unwrap();
        // the view now addresses the tip and writes through
        view.put(b"b", b"2").unwrap();
        assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
    }
}
