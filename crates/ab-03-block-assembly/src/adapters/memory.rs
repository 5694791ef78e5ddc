//! In-memory [`BlockStore`]

use crate::domain::errors::AssemblyError;
use crate::ports::outbound::BlockStore;
use parking_lot::RwLock;
use shared_types::Block;
use std::sync::Arc;

/// Block log held in memory behind a read-write lock.
#[derive(Default)]
pub struct InMemoryBlockStore {
    blocks: RwLock<Vec<Arc<Block>>>,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockStore for InMemoryBlockStore {
    fn append(&self, block: Arc<Block>) -> Result<(), AssemblyError> {
        let mut blocks = self.blocks.write();
        let expected = blocks.len() as u64;
        if block.number() != expected {
            return Err(AssemblyError::NumberMismatch {
                expected,
                got: block.number(),
            });
        }
        blocks.push(block);
        Ok(())
    }

    fn get(&self, number: u64) -> Option<Arc<Block>> {
        let index = usize::try_from(number).ok()?;
        self.blocks.read().get(index).cloned()
    }

    fn height(&self) -> u64 {
        self.blocks.read().len() as u64
    }

    fn append_metadata(&self, number: u64, metadata: Vec<u8>) -> Result<(), AssemblyError> {
        let mut blocks = self.blocks.write();
        let slot = usize::try_from(number)
            .ok()
            .and_then(|index| blocks.get_mut(index))
            .ok_or(AssemblyError::UnknownBlock { number })?;

        // Copy-on-write: readers holding the old Arc keep a consistent block
        let mut updated = (**slot).clone();
        updated.metadata.metadata.push(metadata);
        *slot = Arc::new(updated);
        Ok(())
    }
}
