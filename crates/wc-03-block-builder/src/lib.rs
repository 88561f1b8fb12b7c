//! # Block Builder (wc-03)
//!
//! Buffers messages from any number of producers and turns them into
//! candidate blocks on request.
//!
//! ## Flow
//!
//! ```text
//! producers ──add_message──▶ [pending FIFO] ◀──build_block── driver
//!                                 │
//!                                 └──notify──▶ wait_for_event
//! ```
//!
//! The pending queue is the only structure here shared between independent
//! callers; it sits behind one mutex paired with a `tokio::sync::Notify`.
//!
//! ## Crate Structure
//!
//! - `domain/` - The pending message queue
//! - `events/` - Signals returned by `wait_for_event`
//! - `builder` - [`BlockBuilder`]

pub mod builder;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;

pub use builder::BlockBuilder;
pub use config::BuilderConfig;
pub use domain::PendingQueue;
pub use error::{BuilderError, Result};
pub use events::Event;

/// Most messages a single block may carry
pub const MAX_MESSAGES_PER_BLOCK: usize = 100;

/// Largest accepted message payload (256 KiB)
pub const MAX_MESSAGE_SIZE: usize = 256 * 1024;
