//! # Shared Bus - Stream Plumbing
//!
//! The duplex channel abstraction behind the Broadcast and Deliver streams.
//!
//! ```text
//! ┌──────────────┐   In  (BroadcastMessage / DeliverUpdate)    ┌──────────────┐
//! │    Client    │ ──────────────────────────────────────────→ │   Handler    │
//! │              │ ←────────────────────────────────────────── │              │
//! └──────────────┘   Out (BroadcastResponse / DeliverResponse) └──────────────┘
//! ```
//!
//! Handlers only see [`MessageStream`]; the transport behind it (RPC
//! framing, in-process channels) is not their concern.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod duplex;

pub use duplex::{duplex, MessageStream, StreamEnd, StreamError};

/// Messages buffered per direction before a sender waits.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

