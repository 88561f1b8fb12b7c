//! Signals handed to the consensus driver

use serde::{Deserialize, Serialize};

/// Returned by `BlockBuilder::wait_for_event`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// At least one message is waiting to be built into a block
    PendingMessages,
}
