//! Configuration for Deliver sessions

use serde::{Deserialize, Serialize};

/// Largest window a client may request; larger requests are clamped.
pub const DEFAULT_MAX_WINDOW_SIZE: u64 = 10_000;

/// Deliver configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeliverConfig {
    /// Upper bound on `SeekInfo.WindowSize`
    pub max_window_size: u64,
}

impl Default for DeliverConfig {
    fn default() -> Self {
        Self {
            max_window_size: DEFAULT_MAX_WINDOW_SIZE,
        }
    }
}
