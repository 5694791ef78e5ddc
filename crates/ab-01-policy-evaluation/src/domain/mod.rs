//! Domain module for policy evaluation
//!
//! Contains entities, errors and structural validation of policy trees.

pub mod entities;
pub mod errors;
pub mod validation;

pub use entities::*;
pub use errors::*;
pub use validation::*;
