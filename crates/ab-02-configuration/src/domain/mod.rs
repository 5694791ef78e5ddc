//! Domain module for chain configuration
//!
//! Contains the configuration set, chain parameters and errors.

pub mod entities;
pub mod errors;
pub mod parameters;

pub use entities::*;
pub use errors::*;
pub use parameters::*;
