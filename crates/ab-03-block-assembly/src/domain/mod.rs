//! Domain module for block assembly
//!
//! Pure logic: hashing, batch cutting and chain invariants. No I/O.

pub mod cutter;
pub mod errors;
pub mod hashing;
pub mod invariants;

pub use cutter::*;
pub use errors::*;
pub use hashing::*;
pub use invariants::*;
