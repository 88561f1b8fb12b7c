//! # Adapters Module
//!
//! - `storage`: `KeyValueStore` implementations
//! - `infra`: clocks

pub mod infra;
pub mod storage;

pub use infra::{MockTimeSource, SystemTimeSource};
pub use storage::{FileBackedKVStore, InMemoryKVStore};
