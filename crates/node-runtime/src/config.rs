//! # Node Configuration
//!
//! Defaults, optionally overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `WC_DATA_DIR` | `data_dir` |
//! | `WC_MAX_MESSAGES` | `builder.max_messages_per_block` |
//! | `WC_CLOCK_SKEW_SECS` | `chain.max_clock_skew_secs` |
//! | `WC_GENESIS_TIMESTAMP` | `genesis_timestamp` |
//! | `WC_BLOCK_INTERVAL_MS` | `block_interval_ms` |

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;
use wc_02_chain::ChainConfig;
use wc_03_block_builder::BuilderConfig;

/// File name of the durable store inside `data_dir`
pub const STORE_FILE: &str = "chain.db";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VmConfig {
    pub chain: ChainConfig,
    pub builder: BuilderConfig,
    /// Directory for the durable store; in-memory when unset
    pub data_dir: Option<PathBuf>,
    pub genesis_timestamp: u64,
    /// Pause between a wake-up and building, to let messages batch up
    pub block_interval_ms: u64,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            builder: BuilderConfig::default(),
            data_dir: None,
            genesis_timestamp: 0,
            block_interval_ms: 100,
        }
    }
}

impl VmConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    /// Apply overrides from `lookup`; malformed values are logged and ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("WC_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        match parse_var(&lookup, "WC_MAX_MESSAGES") {
            Some(0) => warn!("Ignoring WC_MAX_MESSAGES=0: a block must hold at least one message"),
            Some(v) => self.builder.max_messages_per_block = v,
            None => {}
        }
        if let Some(v) = parse_var(&lookup, "WC_CLOCK_SKEW_SECS") {
            self.chain.max_clock_skew_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "WC_GENESIS_TIMESTAMP") {
            self.genesis_timestamp = v;
        }
        if let Some(v) = parse_var(&lookup, "WC_BLOCK_INTERVAL_MS") {
            self.block_interval_ms = v;
        }
    }

    pub fn store_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(STORE_FILE))
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid number", name, raw);
            None
        }
    }
}
