//! Ports (hexagonal boundaries) for policy evaluation

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
