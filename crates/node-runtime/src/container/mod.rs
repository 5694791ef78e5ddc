//! # Chain Container
//!
//! Node configuration and the running chains with their lifetime
//! management.

pub mod chains;
pub mod config;

pub use chains::{Chain, ChainRegistry};
pub use config::{ChainConfig, ConfigError, NodeConfig, DEFAULT_CHAIN_ID};
