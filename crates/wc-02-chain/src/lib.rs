//! # Chain (wc-02)
//!
//! Tracks candidate blocks from verification to finalization.
//!
//! ## Model
//!
//! - The last accepted block (the tip) is the only block whose state is
//!   durable. Its state view reads and writes the store directly.
//! - Every verified, undecided block holds an [`Overlay`] of its own writes
//!   on top of its parent's state. Reads fall through the parent chain to
//!   the store.
//! - Accepting a block commits its overlay, messages and header in a single
//!   batch, re-roots its verified children on the store and drops the
//!   previous tip from memory.
//! - Rejecting a block discards it. Its descendants are not walked.
//!
//! ## Crate Structure
//!
//! - `domain/` - Block entity, canonical encoding, overlays
//! - `ports/` - [`ChainApi`], the surface the builder and driver use
//! - `chain` - The block arena
//! - `chain_block` - Per-block state machine
//! - `state_view` - Per-block key/value access
//! - `genesis` - Bootstrap of an empty store
//!
//! ## Usage
//!
//! ```ignore
//! use wc_02_chain::{Chain, ChainApi, ChainConfig};
//!
//! let chain = Chain::new(store, clock, ChainConfig::default())?;
//! let block = chain.new_block(candidate)?;
//! block.verify(&ctx)?;
//! block.state()?.put(b"key", b"value")?;
//! block.accept(&ctx)?;
//! ```

pub mod chain;
pub mod chain_block;
pub mod config;
pub mod domain;
pub mod error;
pub mod genesis;
pub mod ports;
pub mod state_view;

#[cfg(test)]
mod test_utils;

pub use chain::Chain;
pub use chain_block::{BlockStatus, ChainBlock};
pub use config::ChainConfig;
pub use domain::{Block, BlockContext, Overlay, OverlayBase, SealedBlock, MAX_BLOCK_BYTES};
pub use error::{ChainError, Result};
pub use genesis::Genesis;
pub use ports::ChainApi;
pub use state_view::StateView;

/// Tolerated lead of a block timestamp over local time, in seconds
pub const MAX_CLOCK_SKEW_SECS: u64 = 10;
