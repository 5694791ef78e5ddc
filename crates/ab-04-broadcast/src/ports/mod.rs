//! Ports (hexagonal boundaries) for broadcast ingestion

pub mod inbound;

pub use inbound::*;
