//! Configuration for broadcast ingestion

use serde::{Deserialize, Serialize};
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_types::MAX_MESSAGE_BYTES;

/// Broadcast configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BroadcastConfig {
    /// Capacity of the ordering queue; a full queue answers SERVICE_UNAVAILABLE
    pub queue_capacity: usize,
    /// Largest accepted `BroadcastMessage.Data`
    pub max_message_bytes: u64,
    /// Messages one producer stream may have awaiting commit
    pub max_in_flight: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_message_bytes: MAX_MESSAGE_BYTES,
            max_in_flight: 64,
        }
    }
}
