//! # State Storage (wc-01)
//!
//! The durable side of the chain: the key/value store port every other
//! subsystem writes through and the persisted block header format.
//!
//! ## Key Layout
//!
//! | Prefix | Key | Value |
//! |--------|-----|-------|
//! | `blockheader` | block hash | JSON [`BlockHeader`] |
//! | `blockheight` | big-endian height | block hash |
//! | `lastaccepted` | - | block hash |
//! | `message` | message id | raw message bytes |
//! | `lastmsgid` | - | big-endian `u64` counter |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Header entity, key layout, error types
//! - `ports/` - `KeyValueStore` and `TimeSource` traits
//! - `adapters/` - In-memory and file-backed stores, clocks
//! - `accessors` - Typed reads/writes over the key layout
//!
//! ## Usage
//!
//! ```ignore
//! use wc_01_state_storage::{get_block_header, InMemoryKVStore, KeyValueStore};
//!
//! let store = InMemoryKVStore::new();
//! let header = get_block_header(&store, &block_id)?;
//! ```

pub mod accessors;
pub mod adapters;
pub mod domain;
pub mod ports;

pub use accessors::*;
pub use adapters::{FileBackedKVStore, InMemoryKVStore, MockTimeSource, SystemTimeSource};
pub use domain::errors::{KVStoreError, StorageError};
pub use domain::header::BlockHeader;
pub use domain::keys::KeyPrefix;
pub use ports::outbound::{BatchOperation, KeyValueStore, TimeSource};
