//! # Test Fixtures
//!
//! A running [`OrdererService`] with a known administrator, plus helpers to
//! open client streams against it.

use ab_01_policy_evaluation::sign_payload;
use ab_02_configuration::{encode_batch_size, ConfigurationApi, BATCH_SIZE_KEY};
use node_runtime::{GenesisConfig, NodeConfig, OrdererService, ADMINS_POLICY};
use shared_bus::{duplex, StreamEnd};
use shared_crypto::Ed25519KeyPair;
use shared_types::{
    Block, BroadcastMessage, BroadcastResponse, ChainId, Configuration, ConfigurationEntry,
    ConfigurationEnvelope, ConfigurationType, DeliverResponse, DeliverUpdate, Status, Transaction,
};
use std::sync::Arc;

/// Client side of a broadcast stream.
pub type Producer = StreamEnd<BroadcastResponse, BroadcastMessage>;

/// Client side of a deliver stream.
pub type Consumer = StreamEnd<DeliverResponse, DeliverUpdate>;

pub fn admin() -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed([42u8; 32])
}

/// Service with a system chain cutting blocks of `batch_size`.
pub fn start_service(batch_size: u32) -> Arc<OrdererService> {
    start_service_with(NodeConfig::default(), batch_size)
}

pub fn start_service_with(config: NodeConfig, batch_size: u32) -> Arc<OrdererService> {
    let service = OrdererService::new(config).unwrap();
    let genesis = GenesisConfig::new(
        service.system_chain().clone(),
        admin().public_key().as_bytes().to_vec(),
    )
    .with_batch_size(batch_size);
    service.create_chain(genesis).unwrap();
    Arc::new(service)
}

pub fn opaque(payload: &[u8]) -> BroadcastMessage {
    BroadcastMessage::from_transaction(&Transaction::opaque(payload.to_vec())).unwrap()
}

/// BatchSize update at `sequence`, signed by each of `signers` over the
/// envelope.
pub fn batch_size_update(
    service: &OrdererService,
    sequence: u64,
    size: u32,
    signers: &[&Ed25519KeyPair],
) -> BroadcastMessage {
    let chain_id = service.system_chain().clone();
    let configuration = service.chains().configuration(&chain_id).unwrap();
    let current = configuration.current();

    let mut entries: Vec<ConfigurationEntry> = current
        .set
        .items()
        .filter(|item| item.configuration.id != BATCH_SIZE_KEY)
        .map(|item| ConfigurationEntry {
            configuration: item.encoded.clone(),
            signatures: vec![],
        })
        .collect();
    entries.push(
        ConfigurationEntry::new(&Configuration {
            chain_id: chain_id.clone(),
            id: BATCH_SIZE_KEY.to_string(),
            last_modified: sequence,
            kind: ConfigurationType::Chain,
            data: encode_batch_size(size).unwrap(),
            modification_policy: ADMINS_POLICY.to_string(),
        })
        .unwrap(),
    );

    let envelope = ConfigurationEnvelope {
        sequence,
        chain_id,
        entries,
    };
    let bytes = envelope.to_bytes().unwrap();
    let signatures = signers
        .iter()
        .map(|signer| sign_payload(signer, &bytes).unwrap())
        .collect();
    BroadcastMessage::from_transaction(&Transaction::configuration(envelope, signatures)).unwrap()
}

/// Committed configuration sequence of the system chain.
pub fn sequence(service: &OrdererService) -> u64 {
    service
        .chains()
        .configuration(service.system_chain())
        .unwrap()
        .sequence()
}

/// Open a broadcast stream on the system chain.
pub fn open_broadcast(service: &Arc<OrdererService>) -> Producer {
    let (mut server, client) = duplex::<BroadcastMessage, BroadcastResponse>(64);
    let service = Arc::clone(service);
    tokio::spawn(async move { service.broadcast(&mut server).await });
    client
}

/// Open a broadcast stream bound to `chain_id`.
pub fn open_broadcast_to(service: &Arc<OrdererService>, chain_id: ChainId) -> Producer {
    let (mut server, client) = duplex::<BroadcastMessage, BroadcastResponse>(64);
    let service = Arc::clone(service);
    tokio::spawn(async move { service.broadcast_to(&chain_id, &mut server).await });
    client
}

pub fn open_deliver(service: &Arc<OrdererService>) -> Consumer {
    let (mut server, client) = duplex::<DeliverUpdate, DeliverResponse>(64);
    let service = Arc::clone(service);
    tokio::spawn(async move { service.deliver(&mut server).await });
    client
}

/// Send one message and wait for its status.
pub async fn submit(producer: &mut Producer, message: BroadcastMessage) -> Status {
    producer.push(message).await.unwrap();
    producer.next().await.unwrap().status
}

pub async fn next_block(consumer: &mut Consumer) -> Block {
    match consumer.next().await {
        Some(DeliverResponse::Block(block)) => block,
        other => panic!("expected block, got {other:?}"),
    }
}
