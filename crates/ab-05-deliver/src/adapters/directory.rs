//! In-process chain directory

use crate::ports::outbound::ChainDirectory;
use ab_03_block_assembly::LedgerReader;
use parking_lot::RwLock;
use shared_types::ChainId;
use std::collections::HashMap;
use tracing::info;

/// Chain ID -> ledger reader, filled as chains are created.
#[derive(Default)]
pub struct ReaderDirectory {
    readers: RwLock<HashMap<ChainId, LedgerReader>>,
}

impl ReaderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `reader`'s chain; replaces an earlier registration.
    pub fn register(&self, reader: LedgerReader) {
        let chain_id = reader.chain_id().clone();
        info!(chain_id = %chain_id, height = reader.height(), "Chain registered for delivery");
        self.readers.write().insert(chain_id, reader);
    }

    pub fn contains(&self, chain_id: &ChainId) -> bool {
        self.readers.read().contains_key(chain_id)
    }

    pub fn len(&self) -> usize {
        self.readers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.read().is_empty()
    }
}

impl ChainDirectory for ReaderDirectory {
    fn reader(&self, chain_id: &ChainId) -> Option<LedgerReader> {
        self.readers.read().get(chain_id).cloned()
    }
}
