//! # Node Runtime Library
//!
//! Wiring for a single Warp-Chain node. The `main.rs` binary is a thin
//! shell around these pieces.
//!
//! - `config` - [`VmConfig`] defaults and environment overrides
//! - `vm` - [`Vm`], the facade a consensus engine talks to
//! - `driver` - Single-node build/verify/accept loop

pub mod config;
pub mod driver;
pub mod error;
pub mod vm;

pub use config::VmConfig;
pub use driver::{run_driver, wait_for_drain, DriverHandle};
pub use error::VmError;
pub use vm::Vm;
