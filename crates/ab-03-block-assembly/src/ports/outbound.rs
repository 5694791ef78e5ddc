//! Outbound Ports (Driven Ports / SPI)

use crate::domain::errors::AssemblyError;
use shared_types::Block;
use std::sync::Arc;

/// Append-only block log storage.
///
/// Production deployments plug a persistent engine in here.
/// Testing and single-process runs: `InMemoryBlockStore` (adapters/memory.rs)
///
/// The store has a single writer (the chain's ordering loop) and many
/// readers. Readers receive `Arc<Block>` snapshots; a stored block is never
/// mutated in place.
pub trait BlockStore: Send + Sync {
    /// Append `block`; its number must equal the current height.
    fn append(&self, block: Arc<Block>) -> Result<(), AssemblyError>;

    /// Block at `number`, if committed.
    fn get(&self, number: u64) -> Option<Arc<Block>>;

    /// Number of committed blocks.
    fn height(&self) -> u64;

    /// Newest committed block.
    fn tip(&self) -> Option<Arc<Block>> {
        self.height().checked_sub(1).and_then(|n| self.get(n))
    }

    /// Attach a metadata item to a committed block. Not covered by any hash.
    fn append_metadata(&self, number: u64, metadata: Vec<u8>) -> Result<(), AssemblyError>;

    /// Snapshot of blocks `from..to` (clamped to the height).
    fn range(&self, from: u64, to: u64) -> Vec<Arc<Block>> {
        (from..to.min(self.height()))
            .filter_map(|n| self.get(n))
            .collect()
    }
}
