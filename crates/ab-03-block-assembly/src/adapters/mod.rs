//! Adapters for the block assembly ports

pub mod memory;

pub use memory::InMemoryBlockStore;
