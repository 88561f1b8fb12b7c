//! Configuration types for the chain

use serde::Deserialize;

/// Runtime configuration for block verification
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChainConfig {
    /// How far past local time a block timestamp may be, in seconds
    pub max_clock_skew_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_clock_skew_secs: crate::MAX_CLOCK_SKEW_SECS,
        }
    }
}
