//! Ordering parameters carried as `Chain` configuration items
//!
//! | ID | Data | Meaning |
//! |----|------|---------|
//! | `BatchSize` | u32, > 0 | Messages per block |
//! | `BatchTimeout` | u64 ms, > 0 | Max wait before a partial batch is cut |

use super::entities::ConfigurationSet;
use shared_types::codec;
use shared_types::{CodecError, ConfigurationType};
use std::time::Duration;

/// ID of the batch size item.
pub const BATCH_SIZE_KEY: &str = "BatchSize";

/// ID of the batch timeout item.
pub const BATCH_TIMEOUT_KEY: &str = "BatchTimeout";

const PARAMETER_LIMIT: u64 = 64;

/// Batch parameters set by the active configuration. `None` means the item
/// is absent and the assembler default applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainParameters {
    pub batch_size: Option<u32>,
    pub batch_timeout: Option<Duration>,
}

impl ChainParameters {
    /// Read the parameters from a validated set.
    pub fn from_set(set: &ConfigurationSet) -> Self {
        let batch_size = set
            .get(ConfigurationType::Chain, BATCH_SIZE_KEY)
            .and_then(|item| decode_batch_size(&item.configuration.data).ok());
        let batch_timeout = set
            .get(ConfigurationType::Chain, BATCH_TIMEOUT_KEY)
            .and_then(|item| decode_batch_timeout(&item.configuration.data).ok());
        Self {
            batch_size,
            batch_timeout,
        }
    }
}

/// Item data for `BatchSize`.
pub fn encode_batch_size(size: u32) -> Result<Vec<u8>, CodecError> {
    codec::encode(&size)
}

/// Item data for `BatchTimeout`.
pub fn encode_batch_timeout(timeout: Duration) -> Result<Vec<u8>, CodecError> {
    codec::encode(&(timeout.as_millis() as u64))
}

/// Decode and range-check `BatchSize` data.
pub fn decode_batch_size(data: &[u8]) -> Result<u32, String> {
    let size: u32 = codec::decode(data, PARAMETER_LIMIT).map_err(|e| e.to_string())?;
    if size == 0 {
        return Err("batch size must be positive".to_string());
    }
    Ok(size)
}

/// Decode and range-check `BatchTimeout` data.
pub fn decode_batch_timeout(data: &[u8]) -> Result<Duration, String> {
    let millis: u64 = codec::decode(data, PARAMETER_LIMIT).map_err(|e| e.to_string())?;
    if millis == 0 {
        return Err("batch timeout must be positive".to_string());
    }
    Ok(Duration::from_millis(millis))
}
