//! # Broadcast (AB-04)
//!
//! Accepts producer messages for a chain and assigns them their place in the
//! chain's total order.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): message validation, `BroadcastError`
//! - **Ports Layer** (`ports/`): `BroadcastApi`
//! - **Application Layer** (`application/`): `Sequencer` ordering loop,
//!   `BroadcastHandler` per producer stream
//!
//! ## Flow
//!
//! ```text
//! BroadcastMessage -> validate -> SequencerHandle (try_send)
//!                                        |
//!                         Sequencer: admit -> cut -> append -> reply
//!                                        |
//!                       BroadcastResponse (one per message, in order)
//! ```
//!
//! ## Status Codes
//!
//! | Outcome | Status |
//! |---------|--------|
//! | Block holding the message committed | `SUCCESS` |
//! | Empty, oversized or undecodable message | `BAD_REQUEST` |
//! | Configuration update for another chain or out of sequence | `BAD_REQUEST` |
//! | Configuration update failing its modification policy | `FORBIDDEN` |
//! | Queue full, or chain halted | `SERVICE_UNAVAILABLE` |

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod test_utils;

// Re-export public API
pub use application::{BroadcastHandler, Sequencer, SequencerHandle, Ticket};
pub use config::BroadcastConfig;
pub use domain::{validate_message, BroadcastError};
pub use ports::BroadcastApi;
