//! Integration tests

pub mod concurrency;
pub mod lifecycle;

#[cfg(test)]
pub(crate) mod fixtures {
    use node_runtime::{Vm, VmConfig};
    use std::sync::Arc;
    use wc_01_state_storage::{InMemoryKVStore, KeyValueStore, MockTimeSource};
    use wc_02_chain::Genesis;

    pub const GENESIS_TIME: u64 = 1_700_000_000;

    pub struct TestNode {
        pub vm: Vm,
        pub store: Arc<InMemoryKVStore>,
        pub clock: Arc<MockTimeSource>,
    }

    pub fn node() -> TestNode {
        let store = Arc::new(InMemoryKVStore::new());
        let clock = Arc::new(MockTimeSource::new(GENESIS_TIME));
        let vm = Vm::initialize(
            store.clone() as Arc<dyn KeyValueStore>,
            clock.clone(),
            &Genesis {
                timestamp: GENESIS_TIME,
            },
            &VmConfig::default(),
        )
        .unwrap();
        TestNode { vm, store, clock }
    }
}
