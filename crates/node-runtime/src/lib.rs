//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Modular Structure
//!
//! - `container/` - Node configuration, running chains and their registry
//! - `genesis/` - Genesis configuration and block creation
//! - `service` - Broadcast and Deliver stream entry points

pub mod container;
pub mod error;
pub mod genesis;
pub mod service;

pub use container::{Chain, ChainConfig, ChainRegistry, ConfigError, NodeConfig};
pub use error::RuntimeError;
pub use genesis::{GenesisBuilder, GenesisConfig, GenesisError, ADMINS_POLICY};
pub use service::OrdererService;
