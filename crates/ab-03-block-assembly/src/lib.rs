//! # Block Assembly (AB-03)
//!
//! Turns the ordered message stream into hash-chained blocks and owns the
//! append-only block log.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): block cutter, canonical hashing, chain invariants
//! - **Ports Layer** (`ports/`): `BlockStore`
//! - **Adapters** (`adapters/`): `InMemoryBlockStore`
//! - **Application Layer** (`application/`): `ChainLedger` writer, `LedgerReader`
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Sequential numbers | `block[i].Number == i` |
//! | Hash chain | `block[i].PreviousHash == header_hash(block[i-1])` |
//! | Data integrity | `DataHash == data_hash(Data)` |
//! | No reordering | batches concatenate to the admission order |
//! | Config isolation | a configuration transaction is alone in its block |
//!
//! A violated chain invariant is fatal (`AssemblyError::is_fatal`).

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-export public API
pub use adapters::InMemoryBlockStore;
pub use application::{ChainLedger, LedgerReader};
pub use config::AssemblyConfig;
pub use domain::{
    check_link, data_hash, header_hash, next_block, verify_chain, AssemblyError, Batch,
    BlockCutter, Ordered, PendingMessage,
};
pub use ports::BlockStore;
