//! Application layer: the configuration manager service

pub mod manager;

pub use manager::{ActiveConfiguration, ConfigurationManager, ProposedConfiguration};
