//! Runtime errors

use crate::genesis::GenesisError;
use ab_02_configuration::ConfigError;
use ab_03_block_assembly::AssemblyError;
use thiserror::Error;

/// Errors creating or running chains.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Node configuration failed validation.
    #[error("Invalid node configuration: {0}")]
    NodeConfig(#[from] crate::container::ConfigError),

    /// Genesis configuration could not be built.
    #[error(transparent)]
    Genesis(#[from] GenesisError),

    /// Genesis configuration rejected by the configuration manager.
    #[error("Genesis configuration rejected: {0}")]
    Configuration(#[from] ConfigError),

    /// Genesis block could not be committed.
    #[error("Genesis block rejected: {0}")]
    Assembly(#[from] AssemblyError),

    /// A chain with this ID is already running.
    #[error("Chain already exists: {0}")]
    ChainExists(String),
}
