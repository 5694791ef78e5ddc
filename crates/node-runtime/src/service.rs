//! # Orderer Service
//!
//! The node's two public streams on top of the chain registry.
//!
//! ```text
//! Broadcast stream --broadcast_to(chain)--> BroadcastHandler --> chain's Sequencer
//! Deliver stream   --deliver-------------> DeliverHandler   --> chain's LedgerReader
//! ```
//!
//! Opaque transactions carry no chain ID, so a broadcast stream is bound to
//! one chain when it is opened: the system chain by default, or an explicit
//! chain with [`OrdererService::broadcast_to`].

use crate::container::{Chain, ChainRegistry, NodeConfig};
use crate::error::RuntimeError;
use crate::genesis::GenesisConfig;
use ab_04_broadcast::BroadcastHandler;
use ab_05_deliver::{ChainDirectory, DeliverHandler};
use shared_bus::{MessageStream, StreamError};
use shared_types::{
    Block, BroadcastMessage, BroadcastResponse, ChainId, DeliverResponse, DeliverUpdate, Status,
};
use std::sync::Arc;
use tracing::{info, warn};

/// The ordering service of one node.
pub struct OrdererService {
    config: NodeConfig,
    system_chain: ChainId,
    chains: ChainRegistry,
    deliver: DeliverHandler,
}

impl OrdererService {
    /// Create the service; no chain exists yet.
    pub fn new(config: NodeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        let chains = ChainRegistry::new();
        let directory: Arc<dyn ChainDirectory> = chains.directory();
        let deliver = DeliverHandler::new(directory, config.deliver.clone());
        Ok(Self {
            system_chain: ChainId::new(config.chain.chain_id.clone()),
            config,
            chains,
            deliver,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn system_chain(&self) -> &ChainId {
        &self.system_chain
    }

    pub fn chains(&self) -> &ChainRegistry {
        &self.chains
    }

    /// Genesis of the system chain administered by `admin`, with the
    /// configured batch parameters recorded as chain entries.
    pub fn system_genesis(&self, admin: Vec<u8>) -> GenesisConfig {
        GenesisConfig::new(self.system_chain.clone(), admin)
            .with_batch_size(self.config.assembly.batch_size)
            .with_batch_timeout(self.config.assembly.batch_timeout())
    }

    /// Create and start a chain. Returns its genesis block.
    pub fn create_chain(&self, genesis: GenesisConfig) -> Result<Arc<Block>, RuntimeError> {
        if self.chains.contains(&genesis.chain_id) {
            return Err(RuntimeError::ChainExists(genesis.chain_id.to_string()));
        }
        let (chain, block) = Chain::start(genesis, &self.config)?;
        let chain_id = chain.chain_id().clone();
        self.chains.insert(chain)?;
        info!(chain_id = %chain_id, chains = self.chains.len(), "Chain created");
        Ok(block)
    }

    /// Serve a broadcast stream for the system chain.
    pub async fn broadcast<S>(&self, stream: &mut S) -> Result<(), StreamError>
    where
        S: MessageStream<BroadcastMessage, BroadcastResponse>,
    {
        let chain_id = self.system_chain.clone();
        self.broadcast_to(&chain_id, stream).await
    }

    /// Serve a broadcast stream bound to `chain_id`. Every message on a
    /// stream for an unknown chain is answered `NOT_FOUND`.
    pub async fn broadcast_to<S>(&self, chain_id: &ChainId, stream: &mut S) -> Result<(), StreamError>
    where
        S: MessageStream<BroadcastMessage, BroadcastResponse>,
    {
        let Some(handle) = self.chains.handle(chain_id) else {
            warn!(chain_id = %chain_id, "Broadcast stream for unknown chain");
            while stream.recv().await?.is_some() {
                stream
                    .send(BroadcastResponse {
                        status: Status::NotFound,
                    })
                    .await?;
            }
            return Ok(());
        };
        let handler = BroadcastHandler::new(Arc::new(handle), &self.config.broadcast);
        handler.handle(stream).await
    }

    /// Serve a deliver stream; the chain is chosen by each seek.
    pub async fn deliver<S>(&self, stream: &mut S) -> Result<(), StreamError>
    where
        S: MessageStream<DeliverUpdate, DeliverResponse>,
    {
        self.deliver.handle(stream).await
    }

    /// Stop every chain, flushing admitted messages.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        for chain in self.chains.drain() {
            chain.stop().await;
        }
        info!("Shutdown complete");
    }
}
