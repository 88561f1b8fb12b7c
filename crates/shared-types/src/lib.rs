//! # Shared Types Crate
//!
//! Identifiers and value types used across the Warp-Chain subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: block and message identifiers are the same
//!   32-byte [`Id`] everywhere, so a value read from storage can be compared
//!   directly with one computed from a freshly built block.
//! - **Encoding-aware**: [`Id`] serialises as a hex string for human-readable
//!   formats (persisted headers) and as raw bytes for binary formats (block
//!   identity encoding).

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
