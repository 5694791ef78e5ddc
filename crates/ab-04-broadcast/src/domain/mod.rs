//! Domain module for broadcast ingestion

pub mod errors;
pub mod validation;

pub use errors::*;
pub use validation::*;
