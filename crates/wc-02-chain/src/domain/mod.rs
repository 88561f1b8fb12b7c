//! Domain layer - blocks and the state overlay
//!
//! All code here is pure (no locking, no store access).
//!
//! - [`Block`]: immutable block content, canonical encoding, identity
//! - [`SealedBlock`]: a block together with its cached id and bytes
//! - [`Overlay`]: journal of pending writes layered on a parent state

mod block;
mod overlay;

pub use block::{Block, BlockContext, SealedBlock, MAX_BLOCK_BYTES};
pub use overlay::{Overlay, OverlayBase};
