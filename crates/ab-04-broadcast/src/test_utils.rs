//! Fixtures for ordering loop tests

use crate::application::sequencer::{Sequencer, SequencerHandle};
use crate::config::BroadcastConfig;
use ab_01_policy_evaluation::{sign_payload, Ed25519Verifier, PolicyConfig, PolicyEvaluator};
use ab_02_configuration::{encode_batch_size, ConfigurationApi, ConfigurationManager, BATCH_SIZE_KEY};
use ab_03_block_assembly::{
    AssemblyConfig, AssemblyError, BlockStore, ChainLedger, InMemoryBlockStore, LedgerReader,
};
use shared_crypto::{Ed25519KeyPair, HashAlgorithm};
use shared_types::codec;
use shared_types::{
    Block, BroadcastMessage, ChainId, Configuration, ConfigurationEntry, ConfigurationEnvelope,
    ConfigurationType, Policy, SignaturePolicy, SignaturePolicyEnvelope, Transaction,
};
use std::sync::Arc;

pub const CHAIN: &str = "test-chain";

pub struct Fixture {
    pub handle: SequencerHandle,
    pub reader: LedgerReader,
    pub configuration: Arc<ConfigurationManager>,
}

pub fn admin() -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed([1u8; 32])
}

fn item(kind: ConfigurationType, id: &str, sequence: u64, data: Vec<u8>) -> ConfigurationEntry {
    ConfigurationEntry::new(&Configuration {
        chain_id: ChainId::new(CHAIN),
        id: id.to_string(),
        last_modified: sequence,
        kind,
        data,
        modification_policy: "Admins".to_string(),
    })
    .unwrap()
}

pub fn genesis_envelope(batch_size: u32) -> ConfigurationEnvelope {
    let admins = Policy::Signature(SignaturePolicyEnvelope {
        version: 0,
        policy: SignaturePolicy::signed_by(0),
        identities: vec![admin().public_key().as_bytes().to_vec()],
    });
    ConfigurationEnvelope {
        sequence: 0,
        chain_id: ChainId::new(CHAIN),
        entries: vec![
            item(
                ConfigurationType::Policy,
                "Admins",
                0,
                codec::encode(&admins).unwrap(),
            ),
            item(
                ConfigurationType::Chain,
                BATCH_SIZE_KEY,
                0,
                encode_batch_size(batch_size).unwrap(),
            ),
        ],
    }
}

/// Sequencer over a ledger holding the genesis block; not started.
pub fn build(
    batch_size: u32,
    broadcast: BroadcastConfig,
    store: Arc<dyn BlockStore>,
) -> (Sequencer, Fixture) {
    build_with(batch_size, &AssemblyConfig::default(), broadcast, store)
}

/// Like [`build`], with explicit assembly limits.
pub fn build_with(
    batch_size: u32,
    assembly: &AssemblyConfig,
    broadcast: BroadcastConfig,
    store: Arc<dyn BlockStore>,
) -> (Sequencer, Fixture) {
    let chain_id = ChainId::new(CHAIN);
    let envelope = genesis_envelope(batch_size);
    let evaluator = PolicyEvaluator::new(Arc::new(Ed25519Verifier), PolicyConfig::default());
    let configuration = Arc::new(
        ConfigurationManager::from_genesis(chain_id.clone(), &envelope, evaluator).unwrap(),
    );

    let ledger = ChainLedger::new(chain_id, HashAlgorithm::Sha256, store);
    let genesis_tx = codec::encode(&Transaction::configuration(envelope, vec![])).unwrap();
    ledger.append_batch(vec![genesis_tx]).unwrap();
    let reader = ledger.reader();

    let (sequencer, handle) = Sequencer::new(
        ledger,
        Arc::clone(&configuration) as Arc<dyn ConfigurationApi>,
        assembly,
        &broadcast,
    );
    (
        sequencer,
        Fixture {
            handle,
            reader,
            configuration,
        },
    )
}

/// Running sequencer over an in-memory store.
pub fn start(batch_size: u32, broadcast: BroadcastConfig) -> Fixture {
    let (sequencer, fixture) = build(batch_size, broadcast, Arc::new(InMemoryBlockStore::new()));
    tokio::spawn(sequencer.run());
    fixture
}

pub fn opaque(payload: &[u8]) -> BroadcastMessage {
    BroadcastMessage::from_transaction(&Transaction::opaque(payload.to_vec())).unwrap()
}

/// BatchSize update at `sequence`, endorsed by `signer`.
pub fn signed_batch_size_update(
    fixture: &Fixture,
    sequence: u64,
    size: u32,
    signer: &Ed25519KeyPair,
) -> BroadcastMessage {
    let current = fixture.configuration.current();
    let mut entries: Vec<ConfigurationEntry> = current
        .set
        .items()
        .filter(|i| i.configuration.id != BATCH_SIZE_KEY)
        .map(|i| ConfigurationEntry {
            configuration: i.encoded.clone(),
            signatures: vec![],
        })
        .collect();
    entries.push(item(
        ConfigurationType::Chain,
        BATCH_SIZE_KEY,
        sequence,
        encode_batch_size(size).unwrap(),
    ));
    let envelope = ConfigurationEnvelope {
        sequence,
        chain_id: ChainId::new(CHAIN),
        entries,
    };
    let signature = sign_payload(signer, &envelope.to_bytes().unwrap()).unwrap();
    BroadcastMessage::from_transaction(&Transaction::configuration(envelope, vec![signature]))
        .unwrap()
}

pub fn batch_size_update(fixture: &Fixture, sequence: u64, size: u32) -> BroadcastMessage {
    signed_batch_size_update(fixture, sequence, size, &admin())
}

/// Store that refuses every append once it holds `limit` blocks.
pub struct FailingStore {
    inner: InMemoryBlockStore,
    limit: u64,
}

impl FailingStore {
    pub fn new(limit: u64) -> Self {
        Self {
            inner: InMemoryBlockStore::new(),
            limit,
        }
    }
}

impl BlockStore for FailingStore {
    fn append(&self, block: Arc<Block>) -> Result<(), AssemblyError> {
        if self.inner.height() >= self.limit {
            return Err(AssemblyError::NumberMismatch {
                expected: self.limit,
                got: block.number(),
            });
        }
        self.inner.append(block)
    }

    fn get(&self, number: u64) -> Option<Arc<Block>> {
        self.inner.get(number)
    }

    fn height(&self) -> u64 {
        self.inner.height()
    }

    fn append_metadata(&self, number: u64, metadata: Vec<u8>) -> Result<(), AssemblyError> {
        self.inner.append_metadata(number, metadata)
    }
}
