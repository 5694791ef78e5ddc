//! # Deliver (AB-05)
//!
//! Streams committed blocks to consumers, from a position of their choosing,
//! under a flow-control window they move with acknowledgements.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `DeliverSession` state machine, `DeliverError`
//! - **Ports Layer** (`ports/`): `ChainDirectory`
//! - **Adapters** (`adapters/`): `ReaderDirectory`
//! - **Application Layer** (`application/`): `DeliverHandler` stream driver
//!
//! ## Seek Positions
//!
//! | Start | First block |
//! |-------|-------------|
//! | `NEWEST` | newest block at the time of the seek |
//! | `OLDEST` | genesis (block 0) |
//! | `SPECIFIED` | `SpecifiedNumber`, waiting for it if not yet committed |
//!
//! Every session reads the same append-only log, so all consumers of a chain
//! observe the same block sequence.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-export public API
pub use adapters::ReaderDirectory;
pub use application::DeliverHandler;
pub use config::DeliverConfig;
pub use domain::{AckOutcome, DeliverError, DeliverSession, SessionState, Window};
pub use ports::ChainDirectory;
