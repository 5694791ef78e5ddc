//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! Defaults come from each subsystem's own config; `AB_*` environment
//! variables override them:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `AB_CHAIN_ID` | `chain.chain_id` |
//! | `AB_ADMIN_SEED` | `chain.admin_seed` (64 hex chars) |
//! | `AB_BATCH_SIZE` | `assembly.batch_size` |
//! | `AB_BATCH_TIMEOUT_MS` | `assembly.batch_timeout_ms` |
//! | `AB_QUEUE_CAPACITY` | `broadcast.queue_capacity` |
//! | `AB_SIGNATURE_REUSE` | `policy.signature_reuse` (`shared` / `exclusive`) |
//! | `AB_HASH_ALGORITHM` | `assembly.hash_algorithm` (`sha256` / `blake3`) |

use ab_01_policy_evaluation::{PolicyConfig, SignatureReuse};
use ab_03_block_assembly::AssemblyConfig;
use ab_04_broadcast::BroadcastConfig;
use ab_05_deliver::DeliverConfig;
use serde::{Deserialize, Serialize};
use shared_crypto::HashAlgorithm;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Chain ID of the system chain when none is configured.
pub const DEFAULT_CHAIN_ID: &str = "system";

/// Complete node configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    /// System chain configuration.
    pub chain: ChainConfig,
    /// Policy evaluation configuration.
    pub policy: PolicyConfig,
    /// Block assembly configuration.
    pub assembly: AssemblyConfig,
    /// Broadcast ingestion configuration.
    pub broadcast: BroadcastConfig,
    /// Deliver session configuration.
    pub deliver: DeliverConfig,
}

/// System chain configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain ID of the system chain.
    pub chain_id: String,
    /// Seed of the administrator key; a fresh key is generated when unset.
    #[serde(skip_serializing)]
    pub admin_seed: Option<[u8; 32]>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            admin_seed: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Chain ID must not be empty")]
    EmptyChainId,

    #[error("Batch size must be positive")]
    ZeroBatchSize,

    #[error("Batch timeout must be positive")]
    ZeroBatchTimeout,

    #[error("Queue capacity must be positive")]
    ZeroQueueCapacity,

    #[error("Max window size must be positive")]
    ZeroWindow,

    #[error("Max message size {message} exceeds max batch size {batch}")]
    MessageExceedsBatch { message: u64, batch: usize },
}

impl NodeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Apply `AB_*` overrides read through `lookup`. Unparseable values are
    /// logged and ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(chain_id) = lookup("AB_CHAIN_ID") {
            self.chain.chain_id = chain_id;
        }
        if let Some(seed) = lookup("AB_ADMIN_SEED") {
            match parse_seed(&seed) {
                Some(seed) => {
                    self.chain.admin_seed = Some(seed);
                    info!("Loaded admin seed from environment");
                }
                None => warn!("AB_ADMIN_SEED must be 32 bytes (64 hex chars)"),
            }
        }
        if let Some(size) = parse_var(&lookup, "AB_BATCH_SIZE") {
            self.assembly.batch_size = size;
        }
        if let Some(timeout) = parse_var(&lookup, "AB_BATCH_TIMEOUT_MS") {
            self.assembly.batch_timeout_ms = timeout;
        }
        if let Some(capacity) = parse_var(&lookup, "AB_QUEUE_CAPACITY") {
            self.broadcast.queue_capacity = capacity;
        }
        if let Some(value) = lookup("AB_SIGNATURE_REUSE") {
            match SignatureReuse::parse(&value) {
                Some(reuse) => self.policy.signature_reuse = reuse,
                None => warn!(value = %value, "AB_SIGNATURE_REUSE must be shared or exclusive"),
            }
        }
        if let Some(value) = lookup("AB_HASH_ALGORITHM") {
            match HashAlgorithm::parse(&value) {
                Some(algorithm) => self.assembly.hash_algorithm = algorithm,
                None => warn!(value = %value, "AB_HASH_ALGORITHM must be sha256 or blake3"),
            }
        }
    }

    /// Reject configurations no chain could run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.chain_id.is_empty() {
            return Err(ConfigError::EmptyChainId);
        }
        if self.assembly.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.assembly.batch_timeout_ms == 0 {
            return Err(ConfigError::ZeroBatchTimeout);
        }
        if self.broadcast.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.deliver.max_window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.broadcast.max_message_bytes > self.assembly.max_batch_bytes as u64 {
            return Err(ConfigError::MessageExceedsBatch {
                message: self.broadcast.max_message_bytes,
                batch: self.assembly.max_batch_bytes,
            });
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let value = lookup(key)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key, value = %value, "Ignoring unparseable environment override");
            None
        }
    }
}

fn parse_seed(value: &str) -> Option<[u8; 32]> {
    hex::decode(value.trim()).ok()?.try_into().ok()
}
