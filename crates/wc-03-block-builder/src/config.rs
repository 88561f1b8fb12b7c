//! Configuration types for block building

use serde::Deserialize;

/// Runtime configuration for block assembly
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuilderConfig {
    /// Cap on messages drained into one block
    pub max_messages_per_block: usize,

    /// Cap on a single message payload, in bytes
    pub max_message_size: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_messages_per_block: crate::MAX_MESSAGES_PER_BLOCK,
            max_message_size: crate::MAX_MESSAGE_SIZE,
        }
    }
}
