//! # Ports
//!
//! Driven interfaces the host application provides.

pub mod outbound;
