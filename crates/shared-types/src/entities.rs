//! # Wire Entities
//!
//! The message shapes exchanged over the Broadcast and Deliver streams and
//! the data carried inside blocks.
//!
//! ## Clusters
//!
//! - **Chain**: `Block`, `BlockHeader`, `BlockData`, `BlockMetadata`
//! - **Transactions**: `Transaction`, `SignedData`, `PayloadEnvelope`
//! - **Configuration**: `ConfigurationEnvelope`, `ConfigurationEntry`, `Configuration`
//! - **Policy**: `Policy`, `SignaturePolicyEnvelope`, `SignaturePolicy`
//! - **Streams**: `BroadcastMessage`, `BroadcastResponse`, `DeliverUpdate`, `DeliverResponse`
//!
//! Field numbers of the original schema are listed on every struct. The
//! canonical codec encodes fields in declaration order, which follows the
//! field numbers, so declaration order is part of the contract.

use crate::codec::{self, CodecError};
use crate::errors::Status;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte digest (SHA-256 or BLAKE3).
pub type Hash = [u8; 32];

/// `PreviousHash` of the genesis block.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Opaque chain identifier. Never changes for the lifetime of a log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct ChainId(pub String);

impl ChainId {
    /// Create a chain identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Block header: `Number = 1`, `PreviousHash = 2`, `DataHash = 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Position of the block in the chain; 0 for genesis.
    pub number: u64,
    /// Hash of the preceding header; all-zero for genesis.
    pub previous_hash: Hash,
    /// Order-sensitive hash over `BlockData`.
    pub data_hash: Hash,
}

/// Block payload: `Data = 1` (repeated bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockData {
    /// Encoded transactions in admission order.
    pub data: Vec<Vec<u8>>,
}

/// Block annotations: `Metadata = 1` (repeated bytes). Not covered by any hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockMetadata {
    pub metadata: Vec<Vec<u8>>,
}

/// Block: `Header = 1`, `Data = 2`, `Metadata = 3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub data: BlockData,
    pub metadata: BlockMetadata,
}

impl Block {
    /// Block number shortcut.
    pub fn number(&self) -> u64 {
        self.header.number
    }
}

// =============================================================================
// CLUSTER B: TRANSACTIONS
// =============================================================================

/// Signed envelope: `PayloadEnvelope = 1` (encoded [`PayloadEnvelope`]), `Signature = 2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedData {
    pub payload_envelope: Vec<u8>,
    pub signature: Vec<u8>,
}

/// The bytes actually signed: `Payload = 1`, `Signer = 2`.
///
/// The signer identity travels inside the signed bytes so it cannot be
/// swapped without invalidating the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadEnvelope {
    pub payload: Vec<u8>,
    pub signer: Vec<u8>,
}

impl PayloadEnvelope {
    /// Canonical bytes to sign.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self)
    }
}

/// `Transaction.Type` oneof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionBody {
    /// `Opaque = 1`: application bytes ordered without interpretation.
    Opaque(Vec<u8>),
    /// `ConfigurationEnvelope = 2`: a chain configuration update.
    ConfigurationEnvelope(ConfigurationEnvelope),
}

/// Transaction: `Type = 1..2` (oneof), `Signatures = 3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub body: TransactionBody,
    pub signatures: Vec<SignedData>,
}

impl Transaction {
    /// Unsigned opaque transaction.
    pub fn opaque(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            body: TransactionBody::Opaque(payload.into()),
            signatures: Vec::new(),
        }
    }

    /// Configuration transaction with transaction-level endorsements.
    pub fn configuration(envelope: ConfigurationEnvelope, signatures: Vec<SignedData>) -> Self {
        Self {
            body: TransactionBody::ConfigurationEnvelope(envelope),
            signatures,
        }
    }

    /// Returns the configuration envelope if this is a configuration transaction.
    pub fn as_configuration(&self) -> Option<&ConfigurationEnvelope> {
        match &self.body {
            TransactionBody::ConfigurationEnvelope(envelope) => Some(envelope),
            TransactionBody::Opaque(_) => None,
        }
    }
}

// =============================================================================
// CLUSTER C: CONFIGURATION
// =============================================================================

/// Configuration update: `Sequence = 1`, `ChainID = 2`, `Entries = 3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationEnvelope {
    pub sequence: u64,
    pub chain_id: ChainId,
    pub entries: Vec<ConfigurationEntry>,
}

impl ConfigurationEnvelope {
    /// Canonical bytes, the payload transaction-level endorsements sign.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self)
    }
}

/// One item of an update: `Configuration = 1` (encoded [`Configuration`]), `Signatures = 2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationEntry {
    pub configuration: Vec<u8>,
    pub signatures: Vec<SignedData>,
}

impl ConfigurationEntry {
    /// Encode `configuration` into an unsigned entry.
    pub fn new(configuration: &Configuration) -> Result<Self, CodecError> {
        Ok(Self {
            configuration: codec::encode(configuration)?,
            signatures: Vec::new(),
        })
    }

    /// Attach an endorsement.
    pub fn with_signature(mut self, signature: SignedData) -> Self {
        self.signatures.push(signature);
        self
    }
}

/// `Configuration.Type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigurationType {
    Policy = 0,
    Fabric = 1,
    Chain = 2,
    Solo = 3,
    Kafka = 4,
    Pbft = 5,
}

impl fmt::Display for ConfigurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Policy => "Policy",
            Self::Fabric => "Fabric",
            Self::Chain => "Chain",
            Self::Solo => "Solo",
            Self::Kafka => "Kafka",
            Self::Pbft => "PBFT",
        };
        f.write_str(name)
    }
}

/// A configuration item: `ChainID = 1`, `ID = 2`, `LastModified = 3`,
/// `Type = 4`, `Data = 5`, `ModificationPolicy = 6`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub chain_id: ChainId,
    pub id: String,
    pub last_modified: u64,
    pub kind: ConfigurationType,
    pub data: Vec<u8>,
    /// Name of the `Policy` item that must authorize changes to this item.
    pub modification_policy: String,
}

// =============================================================================
// CLUSTER D: POLICY
// =============================================================================

/// `Policy.Type` oneof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// `SignaturePolicy = 1`.
    Signature(SignaturePolicyEnvelope),
}

/// `Version = 1`, `Policy = 2`, `Identities = 3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePolicyEnvelope {
    pub version: i32,
    pub policy: SignaturePolicy,
    /// Registered identities; `SignedBy(i)` refers to `identities[i]`.
    pub identities: Vec<Vec<u8>>,
}

/// `SignaturePolicy.Type` oneof. Children are owned by their parent, so a
/// decoded policy is always a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignaturePolicy {
    /// `SignedBy = 1`: index into the envelope identities.
    SignedBy(i32),
    /// `From = 2`: at least `n` of `policies` must hold.
    NOutOf { n: i32, policies: Vec<SignaturePolicy> },
}

impl SignaturePolicy {
    /// Leaf requiring a signature from identity `index`.
    pub fn signed_by(index: i32) -> Self {
        Self::SignedBy(index)
    }

    /// Threshold node.
    pub fn n_out_of(n: i32, policies: Vec<SignaturePolicy>) -> Self {
        Self::NOutOf { n, policies }
    }

    /// Nesting depth; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::SignedBy(_) => 1,
            Self::NOutOf { policies, .. } => {
                1 + policies.iter().map(Self::depth).max().unwrap_or(0)
            }
        }
    }
}

// =============================================================================
// CLUSTER E: STREAMS
// =============================================================================

/// Broadcast request: `Data = 1` (encoded [`Transaction`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    pub data: Vec<u8>,
}

impl BroadcastMessage {
    /// Wrap an encoded transaction.
    pub fn from_transaction(tx: &Transaction) -> Result<Self, CodecError> {
        Ok(Self {
            data: codec::encode(tx)?,
        })
    }
}

/// Broadcast reply: `Status = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub status: Status,
}

/// `SeekInfo.SeekPosition` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeekPosition {
    Newest = 0,
    Oldest = 1,
    Specified = 2,
}

/// `Start = 1`, `SpecifiedNumber = 2`, `WindowSize = 3`, `ChainID = 4`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekInfo {
    pub start: SeekPosition,
    pub specified_number: u64,
    pub window_size: u64,
    pub chain_id: ChainId,
}

impl SeekInfo {
    /// Seek to the newest block.
    pub fn newest(chain_id: ChainId, window_size: u64) -> Self {
        Self {
            start: SeekPosition::Newest,
            specified_number: 0,
            window_size,
            chain_id,
        }
    }

    /// Seek to genesis.
    pub fn oldest(chain_id: ChainId, window_size: u64) -> Self {
        Self {
            start: SeekPosition::Oldest,
            specified_number: 0,
            window_size,
            chain_id,
        }
    }

    /// Seek to block `number`, waiting for it if necessary.
    pub fn specified(chain_id: ChainId, number: u64, window_size: u64) -> Self {
        Self {
            start: SeekPosition::Specified,
            specified_number: number,
            window_size,
            chain_id,
        }
    }
}

/// `Number = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub number: u64,
}

/// `DeliverUpdate.Type` oneof: `Acknowledgement = 1`, `Seek = 2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliverUpdate {
    Acknowledgement(Acknowledgement),
    Seek(SeekInfo),
}

/// `DeliverResponse.Type` oneof: `Error = 1`, `Block = 2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliverResponse {
    Error(Status),
    Block(Block),
}
