//! Domain module for Deliver sessions

pub mod errors;
pub mod session;

pub use errors::*;
pub use session::*;
