//! # Chains
//!
//! One [`Chain`] per chain ID: its configuration manager, block log and
//! ordering loop task. The [`ChainRegistry`] owns them and publishes each
//! chain's reader for Deliver sessions.
//!
//! ## Startup Sequence
//!
//! 1. Build the genesis configuration envelope
//! 2. Activate it in a fresh `ConfigurationManager` (structural checks only)
//! 3. Commit the genesis block to an empty ledger
//! 4. Spawn the ordering loop; its position counter starts at 0

use super::config::NodeConfig;
use crate::error::RuntimeError;
use crate::genesis::{GenesisBuilder, GenesisConfig};
use ab_01_policy_evaluation::{Ed25519Verifier, PolicyEvaluator};
use ab_02_configuration::{ConfigurationApi, ConfigurationManager};
use ab_03_block_assembly::{ChainLedger, InMemoryBlockStore, LedgerReader};
use ab_04_broadcast::{Sequencer, SequencerHandle};
use ab_05_deliver::ReaderDirectory;
use parking_lot::RwLock;
use shared_types::{Block, ChainId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// How long `stop` waits for an ordering loop to flush.
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// A running chain.
pub struct Chain {
    chain_id: ChainId,
    handle: SequencerHandle,
    reader: LedgerReader,
    configuration: Arc<ConfigurationManager>,
    task: JoinHandle<()>,
}

impl Chain {
    /// Create a chain from its genesis configuration and start its ordering
    /// loop. Must be called within a Tokio runtime.
    pub fn start(
        genesis: GenesisConfig,
        config: &NodeConfig,
    ) -> Result<(Self, Arc<Block>), RuntimeError> {
        let chain_id = genesis.chain_id.clone();
        let (envelope, genesis_data) = GenesisBuilder::new(genesis).transaction()?;

        let evaluator = PolicyEvaluator::new(Arc::new(Ed25519Verifier), config.policy.clone());
        let configuration = Arc::new(ConfigurationManager::from_genesis(
            chain_id.clone(),
            &envelope,
            evaluator,
        )?);

        let ledger = ChainLedger::new(
            chain_id.clone(),
            config.assembly.hash_algorithm,
            Arc::new(InMemoryBlockStore::new()),
        );
        let genesis_block = ledger.append_batch(vec![genesis_data])?;
        let reader = ledger.reader();

        let (sequencer, handle) = Sequencer::new(
            ledger,
            Arc::clone(&configuration) as Arc<dyn ConfigurationApi>,
            &config.assembly,
            &config.broadcast,
        );
        let task = tokio::spawn(sequencer.run());

        let chain = Self {
            chain_id,
            handle,
            reader,
            configuration,
            task,
        };
        Ok((chain, genesis_block))
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    /// Submission handle for broadcast streams.
    pub fn handle(&self) -> SequencerHandle {
        self.handle.clone()
    }

    pub fn reader(&self) -> LedgerReader {
        self.reader.clone()
    }

    pub fn configuration(&self) -> Arc<ConfigurationManager> {
        Arc::clone(&self.configuration)
    }

    pub fn is_halted(&self) -> bool {
        self.handle.is_halted()
    }

    /// Release the chain's handle and wait for the ordering loop to flush.
    /// The loop keeps running while broadcast streams still hold handles.
    pub async fn stop(self) {
        let Self {
            chain_id,
            handle,
            mut task,
            ..
        } = self;
        drop(handle);
        match tokio::time::timeout(STOP_TIMEOUT, &mut task).await {
            Ok(_) => info!(chain_id = %chain_id, "Chain stopped"),
            Err(_) => {
                warn!(chain_id = %chain_id, "Ordering loop still busy, aborting");
                task.abort();
            }
        }
    }
}

/// All chains served by this node.
pub struct ChainRegistry {
    chains: RwLock<HashMap<ChainId, Chain>>,
    directory: Arc<ReaderDirectory>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self {
            chains: RwLock::new(HashMap::new()),
            directory: Arc::new(ReaderDirectory::new()),
        }
    }

    /// Readers of every registered chain, for Deliver sessions.
    pub fn directory(&self) -> Arc<ReaderDirectory> {
        Arc::clone(&self.directory)
    }

    /// Register a started chain.
    pub fn insert(&self, chain: Chain) -> Result<(), RuntimeError> {
        let mut chains = self.chains.write();
        if chains.contains_key(chain.chain_id()) {
            return Err(RuntimeError::ChainExists(chain.chain_id().to_string()));
        }
        self.directory.register(chain.reader());
        chains.insert(chain.chain_id().clone(), chain);
        Ok(())
    }

    pub fn contains(&self, chain_id: &ChainId) -> bool {
        self.chains.read().contains_key(chain_id)
    }

    pub fn handle(&self, chain_id: &ChainId) -> Option<SequencerHandle> {
        self.chains.read().get(chain_id).map(Chain::handle)
    }

    pub fn reader(&self, chain_id: &ChainId) -> Option<LedgerReader> {
        self.chains.read().get(chain_id).map(Chain::reader)
    }

    pub fn configuration(&self, chain_id: &ChainId) -> Option<Arc<ConfigurationManager>> {
        self.chains.read().get(chain_id).map(Chain::configuration)
    }

    pub fn chain_ids(&self) -> Vec<ChainId> {
        let mut ids: Vec<ChainId> = self.chains.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.chains.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.read().is_empty()
    }

    /// Remove every chain, for shutdown.
    pub fn drain(&self) -> Vec<Chain> {
        self.chains.write().drain().map(|(_, chain)| chain).collect()
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new()
    }
}
