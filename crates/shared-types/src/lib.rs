//! # Shared Types Crate
//!
//! The wire contract of the ordering service and the canonical codec.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every message that crosses a stream or lands
//!   in a block is defined here.
//! - **Closed Unions**: each `oneof` of the schema is a Rust enum; consumers
//!   match exhaustively.
//! - **Hash Stability**: anything signed or hashed is encoded through
//!   [`codec`], never ad hoc.

pub mod codec;
pub mod entities;
pub mod errors;

pub use codec::{CodecError, MAX_MESSAGE_BYTES, MAX_POLICY_BYTES};
pub use entities::*;
pub use errors::Status;
