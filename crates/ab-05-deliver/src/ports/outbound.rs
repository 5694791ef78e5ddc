//! Outbound Ports (Driven Ports / SPI)

use ab_03_block_assembly::LedgerReader;
use shared_types::ChainId;

/// Resolves the chain a seek names to a read handle on its block log.
pub trait ChainDirectory: Send + Sync {
    /// Fresh reader for `chain_id`, or `None` if the chain is not served.
    fn reader(&self, chain_id: &ChainId) -> Option<LedgerReader>;
}
