//! # Atomic Broadcast Node Runtime
//!
//! The main entry point for the ordering node.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then `AB_*` environment overrides)
//! 2. Validate it
//! 3. Load or generate the administrator key
//! 4. Create the system chain from a generated genesis configuration
//! 5. Run until Ctrl+C, then flush and stop every chain

use anyhow::{Context, Result};
use node_runtime::container::NodeConfig;
use node_runtime::OrdererService;
use shared_crypto::Ed25519KeyPair;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("===========================================");
    info!("  Atomic Broadcast Node Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    // Load configuration
    let config = NodeConfig::from_env();
    config.validate().context("Invalid node configuration")?;
    debug!(config = %serde_json::to_string(&config)?, "Effective configuration");

    let admin = match config.chain.admin_seed {
        Some(seed) => Ed25519KeyPair::from_seed(seed),
        None => {
            warn!("AB_ADMIN_SEED not set, using an ephemeral administrator key");
            Ed25519KeyPair::generate()
        }
    };
    let admin_identity = admin.public_key().as_bytes().to_vec();
    info!(admin = %hex::encode(&admin_identity), "Administrator identity");

    // Create the system chain
    let service = OrdererService::new(config)?;
    let genesis = service.system_genesis(admin_identity);
    let block = service
        .create_chain(genesis)
        .context("Failed to create system chain")?;
    let hash = ab_03_block_assembly::header_hash(
        service.config().assembly.hash_algorithm,
        &block.header,
    );
    info!(
        chain_id = %service.system_chain(),
        number = block.number(),
        hash = %hex::encode(hash),
        data_hash = %hex::encode(block.header.data_hash),
        "Genesis block committed"
    );

    // Keep the node running
    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // Graceful shutdown
    service.shutdown().await;

    Ok(())
}
