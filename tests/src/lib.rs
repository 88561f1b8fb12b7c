//! # Warp-Chain Test Suite
//!
//! Cross-crate tests that exercise the chain, the builder and the node
//! runtime together.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── lifecycle.rs    # genesis → build → verify → accept/reject, restart
//!     └── concurrency.rs  # producers racing the block-production loop
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wc-tests
//! cargo test -p wc-tests integration::concurrency
//! ```

pub mod integration;
