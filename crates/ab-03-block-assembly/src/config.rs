//! Configuration for block assembly

use serde::{Deserialize, Serialize};
use shared_crypto::HashAlgorithm;
use std::time::Duration;

/// Default messages per block when the chain configuration sets none.
pub const DEFAULT_BATCH_SIZE: u32 = 10;

/// Default batch timeout in milliseconds.
pub const DEFAULT_BATCH_TIMEOUT_MS: u64 = 2_000;

/// Default byte limit of one batch (4 MiB).
pub const DEFAULT_MAX_BATCH_BYTES: usize = 4 * 1024 * 1024;

/// Block assembly configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Digest for header and data hashes; fixed for the life of a chain
    pub hash_algorithm: HashAlgorithm,
    /// Messages per block unless the chain configuration overrides it
    pub batch_size: u32,
    /// Partial batch cut delay unless the chain configuration overrides it
    pub batch_timeout_ms: u64,
    /// A batch is cut once its payload reaches this many bytes
    pub max_batch_bytes: usize,
}

impl AssemblyConfig {
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::Sha256,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_timeout_ms: DEFAULT_BATCH_TIMEOUT_MS,
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
        }
    }
}
