//! # Genesis Builder
//!
//! Creates the sequence-0 configuration of a new chain and the genesis
//! block transaction that carries it.

use ab_02_configuration::{encode_batch_size, encode_batch_timeout, BATCH_SIZE_KEY, BATCH_TIMEOUT_KEY};
use shared_types::codec;
use shared_types::{
    ChainId, CodecError, Configuration, ConfigurationEntry, ConfigurationEnvelope,
    ConfigurationType, Policy, SignaturePolicy, SignaturePolicyEnvelope, Transaction,
};
use std::time::Duration;
use thiserror::Error;

/// Name of the policy guarding every genesis entry.
pub const ADMINS_POLICY: &str = "Admins";

/// Genesis creation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenesisError {
    /// Invalid genesis configuration.
    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(String),

    /// Encoding failed.
    #[error("Genesis encoding failed: {0}")]
    Codec(#[from] CodecError),
}

/// Genesis configuration.
#[derive(Debug, Clone)]
pub struct GenesisConfig {
    /// Chain ID of the new chain.
    pub chain_id: ChainId,

    /// Administrator identities (Ed25519 public keys).
    pub admins: Vec<Vec<u8>>,

    /// Administrator signatures required to modify any genesis entry.
    pub admin_threshold: u32,

    /// `BatchSize` entry; omitted when `None`.
    pub batch_size: Option<u32>,

    /// `BatchTimeout` entry; omitted when `None`.
    pub batch_timeout: Option<Duration>,
}

impl GenesisConfig {
    /// Single-administrator chain.
    pub fn new(chain_id: ChainId, admin: Vec<u8>) -> Self {
        Self {
            chain_id,
            admins: vec![admin],
            admin_threshold: 1,
            batch_size: None,
            batch_timeout: None,
        }
    }

    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = Some(timeout);
        self
    }
}

/// Genesis builder.
pub struct GenesisBuilder {
    config: GenesisConfig,
}

impl GenesisBuilder {
    pub fn new(config: GenesisConfig) -> Self {
        Self { config }
    }

    /// Build the sequence-0 configuration envelope.
    pub fn build(&self) -> Result<ConfigurationEnvelope, GenesisError> {
        self.validate()?;

        let mut entries = vec![self.entry(
            ConfigurationType::Policy,
            ADMINS_POLICY,
            codec::encode(&self.admins_policy())?,
        )?];
        if let Some(size) = self.config.batch_size {
            entries.push(self.entry(
                ConfigurationType::Chain,
                BATCH_SIZE_KEY,
                encode_batch_size(size)?,
            )?);
        }
        if let Some(timeout) = self.config.batch_timeout {
            entries.push(self.entry(
                ConfigurationType::Chain,
                BATCH_TIMEOUT_KEY,
                encode_batch_timeout(timeout)?,
            )?);
        }

        Ok(ConfigurationEnvelope {
            sequence: 0,
            chain_id: self.config.chain_id.clone(),
            entries,
        })
    }

    /// The content of block 0: the genesis configuration as a transaction.
    pub fn transaction(&self) -> Result<(ConfigurationEnvelope, Vec<u8>), GenesisError> {
        let envelope = self.build()?;
        let data = codec::encode(&Transaction::configuration(envelope.clone(), vec![]))?;
        Ok((envelope, data))
    }

    fn validate(&self) -> Result<(), GenesisError> {
        let config = &self.config;
        if config.chain_id.as_str().is_empty() {
            return Err(GenesisError::InvalidConfig("empty chain ID".into()));
        }
        if config.admins.is_empty() {
            return Err(GenesisError::InvalidConfig("no administrators".into()));
        }
        if config.admins.iter().any(Vec::is_empty) {
            return Err(GenesisError::InvalidConfig("empty administrator identity".into()));
        }
        if config.admin_threshold == 0 || config.admin_threshold as usize > config.admins.len() {
            return Err(GenesisError::InvalidConfig(format!(
                "admin threshold {} out of range 1..={}",
                config.admin_threshold,
                config.admins.len()
            )));
        }
        if config.batch_size == Some(0) {
            return Err(GenesisError::InvalidConfig("zero batch size".into()));
        }
        if config.batch_timeout.is_some_and(|t| t.as_millis() == 0) {
            return Err(GenesisError::InvalidConfig("zero batch timeout".into()));
        }
        Ok(())
    }

    /// `admin_threshold` out of the administrators.
    fn admins_policy(&self) -> Policy {
        let leaves = (0..self.config.admins.len())
            .map(|i| SignaturePolicy::signed_by(i as i32))
            .collect();
        Policy::Signature(SignaturePolicyEnvelope {
            version: 0,
            policy: SignaturePolicy::n_out_of(self.config.admin_threshold as i32, leaves),
            identities: self.config.admins.clone(),
        })
    }

    fn entry(
        &self,
        kind: ConfigurationType,
        id: &str,
        data: Vec<u8>,
    ) -> Result<ConfigurationEntry, GenesisError> {
        let configuration = Configuration {
            chain_id: self.config.chain_id.clone(),
            id: id.to_string(),
            last_modified: 0,
            kind,
            data,
            modification_policy: ADMINS_POLICY.to_string(),
        };
        Ok(ConfigurationEntry::new(&configuration)?)
    }
}
