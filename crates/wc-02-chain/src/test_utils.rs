//! Shared fixtures for unit tests

use crate::chain::Chain;
use crate::chain_block::ChainBlock;
use crate::config::ChainConfig;
use crate::domain::Block;
use crate::genesis::{self, Genesis};
use shared_types::{hash256, MessageId, Timestamp};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wc_01_state_storage::{
    BatchOperation, InMemoryKVStore, KVStoreError, KeyValueStore, MockTimeSource,
};

/// Chain over a fresh in-memory store whose genesis and clock both sit at `now`
pub(crate) fn new_chain(now: Timestamp) -> (Chain, Arc<InMemoryKVStore>, Arc<MockTimeSource>) {
    let store = Arc::new(InMemoryKVStore::new());
    genesis::initialize(&*store, &Genesis { timestamp: now }).unwrap();
    let clock = Arc::new(MockTimeSource::new(now));
    let chain = Chain::new(store.clone(), clock.clone(), ChainConfig::default()).unwrap();
    (chain, store, clock)
}

pub(crate) fn child_of(parent: &ChainBlock, timestamp: Timestamp) -> Block {
    Block {
        parent_id: parent.id(),
        height: parent.height() + 1,
        timestamp,
        messages: Vec::new(),
        message_bytes: Default::default(),
    }
}

pub(crate) fn with_message(block: &mut Block, bytes: &[u8]) -> MessageId {
    let id = hash256(bytes);
    block.messages.push(id);
    block.message_bytes.insert(id, bytes.to_vec());
    id
}

/// Store whose writes can be made to fail on demand
#[derive(Default)]
pub(crate) struct FailingStore {
    inner: InMemoryKVStore,
    fail: AtomicBool,
}

impl FailingStore {
    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), KVStoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(KVStoreError::IOError {
                message: "injected write failure".into(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.inner.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.check()?;
        self.inner.put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.check()?;
        self.inner.delete(key)
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.check()?;
        self.inner.atomic_batch_write(operations)
    }
}
