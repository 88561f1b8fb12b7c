//! # Domain Layer
//!
//! Pure types for the persisted side of the chain.

pub mod errors;
pub mod header;
pub mod keys;
