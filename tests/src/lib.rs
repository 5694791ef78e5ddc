//! # Atomic Broadcast Test Suite
//!
//! Cross-crate scenarios driven through the node runtime's public streams.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Service, keys and stream helpers
//! └── integration/      # End-to-end Broadcast -> order -> Deliver flows
//!     ├── broadcast_flows.rs
//!     ├── configuration_flows.rs
//!     └── deliver_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ab-tests
//!
//! # Benchmarks
//! cargo bench -p ab-tests
//! ```

pub mod fixtures;
pub mod integration;
