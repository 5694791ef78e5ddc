//! Ports (hexagonal boundaries) for configuration management

pub mod inbound;

pub use inbound::*;
