//! Ports (hexagonal boundaries) for block assembly

pub mod outbound;

pub use outbound::*;
