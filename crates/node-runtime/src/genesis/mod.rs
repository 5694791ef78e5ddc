//! # Genesis Module
//!
//! Genesis configuration and chain initialization.
//!
//! The genesis block of a chain has special properties:
//!
//! - Number: 0
//! - Previous hash: 32 zero bytes
//! - Data: exactly one configuration transaction with `Sequence = 0`
//!
//! Genesis is checked structurally only; no signature is required.

pub mod builder;

pub use builder::{GenesisBuilder, GenesisConfig, GenesisError, ADMINS_POLICY};
