//! Ports (hexagonal boundaries) for Deliver sessions

pub mod outbound;

pub use outbound::*;
