//! # Chain Ledger
//!
//! The single writer of a chain's block log, and the read handles Deliver
//! sessions use.
//!
//! ```text
//! ordering loop --append_batch--> ChainLedger --append--> BlockStore
//!                                      |
//!                                  watch(height)
//!                                      v
//!                         LedgerReader (one per session)
//! ```
//!
//! Every append re-checks numbering, link and data hash against the stored
//! tip before the block becomes visible. Readers are notified through a
//! `watch` channel, so a waiting session is woken by the commit itself.

use crate::domain::errors::AssemblyError;
use crate::domain::invariants::{check_link, next_block, verify_chain};
use crate::ports::outbound::BlockStore;
use shared_crypto::HashAlgorithm;
use shared_types::{Block, ChainId};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Write side of a chain's block log.
pub struct ChainLedger {
    chain_id: ChainId,
    algorithm: HashAlgorithm,
    store: Arc<dyn BlockStore>,
    height_tx: watch::Sender<u64>,
}

impl ChainLedger {
    pub fn new(chain_id: ChainId, algorithm: HashAlgorithm, store: Arc<dyn BlockStore>) -> Self {
        let (height_tx, _) = watch::channel(store.height());
        Self {
            chain_id,
            algorithm,
            store,
            height_tx,
        }
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn height(&self) -> u64 {
        self.store.height()
    }

    /// Build the next block from an ordered batch and commit it.
    pub fn append_batch(&self, data: Vec<Vec<u8>>) -> Result<Arc<Block>, AssemblyError> {
        let tip = self.store.tip();
        let block = next_block(self.algorithm, tip.as_ref().map(|b| &b.header), data);
        self.append_block(block)
    }

    /// Commit a fully built block after checking it against the tip.
    pub fn append_block(&self, block: Block) -> Result<Arc<Block>, AssemblyError> {
        let tip = self.store.tip();
        if let Err(e) = check_link(self.algorithm, tip.as_ref().map(|b| &b.header), &block) {
            error!(
                chain_id = %self.chain_id,
                number = block.number(),
                error = %e,
                "Block rejected by chain invariants"
            );
            return Err(e);
        }

        let block = Arc::new(block);
        self.store.append(Arc::clone(&block))?;
        let height = self.store.height();
        self.height_tx.send_replace(height);

        info!(
            chain_id = %self.chain_id,
            number = block.number(),
            transactions = block.data.data.len(),
            "Block committed"
        );
        Ok(block)
    }

    /// Annotate a committed block. Readers see the new metadata on their
    /// next fetch; the chain hashes are unaffected.
    pub fn append_metadata(&self, number: u64, metadata: Vec<u8>) -> Result<(), AssemblyError> {
        self.store.append_metadata(number, metadata)?;
        debug!(chain_id = %self.chain_id, number, "Block metadata appended");
        Ok(())
    }

    /// Full-chain integrity check.
    pub fn verify(&self) -> Result<(), AssemblyError> {
        let blocks = self.store.range(0, self.store.height());
        verify_chain(self.algorithm, &blocks)
    }

    /// New read handle.
    pub fn reader(&self) -> LedgerReader {
        LedgerReader {
            chain_id: self.chain_id.clone(),
            store: Arc::clone(&self.store),
            height_rx: self.height_tx.subscribe(),
        }
    }
}

/// Read side of a chain's block log. Cheap to clone.
#[derive(Clone)]
pub struct LedgerReader {
    chain_id: ChainId,
    store: Arc<dyn BlockStore>,
    height_rx: watch::Receiver<u64>,
}

impl LedgerReader {
    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn height(&self) -> u64 {
        self.store.height()
    }

    /// Number of the newest block; `None` for an empty log.
    pub fn newest(&self) -> Option<u64> {
        self.height().checked_sub(1)
    }

    pub fn get(&self, number: u64) -> Option<Arc<Block>> {
        self.store.get(number)
    }

    /// Committed blocks `from..to`.
    pub fn blocks(&self, from: u64, to: u64) -> Vec<Arc<Block>> {
        self.store.range(from, to)
    }

    /// Height notifications; the value is the number of committed blocks.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.height_rx.clone()
    }

    /// Wait until block `number` is committed and return it.
    pub async fn wait_for(&mut self, number: u64) -> Result<Arc<Block>, AssemblyError> {
        if let Some(block) = self.store.get(number) {
            return Ok(block);
        }
        self.height_rx
            .wait_for(|height| *height > number)
            .await
            .map_err(|_| AssemblyError::LedgerClosed)?;
        self.store
            .get(number)
            .ok_or(AssemblyError::UnknownBlock { number })
    }
}
