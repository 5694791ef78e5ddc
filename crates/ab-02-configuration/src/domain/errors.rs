//! Error types for configuration validation

use ab_01_policy_evaluation::PolicyError;
use shared_types::{CodecError, ConfigurationType, Status};
use thiserror::Error;

/// Reasons a configuration update is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Envelope targets another chain
    #[error("Wrong chain: expected {expected}, got {got}")]
    WrongChain { expected: String, got: String },

    /// Sequence is not exactly current + 1
    #[error("Sequence mismatch: expected {expected}, got {got}")]
    SequenceMismatch { expected: u64, got: u64 },

    /// Envelope has no entries
    #[error("Configuration envelope is empty")]
    Empty,

    /// Entry bytes do not decode as a configuration item
    #[error("Entry {index} is malformed: {reason}")]
    MalformedEntry { index: usize, reason: String },

    /// Entry names a different chain than its envelope
    #[error("Entry {kind}/{id} names chain {got}")]
    EntryChainMismatch {
        kind: ConfigurationType,
        id: String,
        got: String,
    },

    /// A required field is empty
    #[error("Entry {index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },

    /// Same (Type, ID) twice in one envelope
    #[error("Duplicate entry {kind}/{id}")]
    DuplicateEntry { kind: ConfigurationType, id: String },

    /// LastModified is ahead of the envelope sequence
    #[error("Entry {kind}/{id} modified at {last_modified}, after sequence {sequence}")]
    FutureModification {
        kind: ConfigurationType,
        id: String,
        last_modified: u64,
        sequence: u64,
    },

    /// Entry claims to be unchanged but differs from (or is absent in) the active set
    #[error("Entry {kind}/{id} claims to be unchanged but differs from the active entry")]
    UnchangedEntryDiffers { kind: ConfigurationType, id: String },

    /// An active entry is missing from the envelope
    #[error("Active entry {kind}/{id} is missing")]
    MissingEntry { kind: ConfigurationType, id: String },

    /// No entry carries the new sequence
    #[error("No entry anchors sequence {sequence}")]
    MissingAnchor { sequence: u64 },

    /// Entry data is not well-formed for its type
    #[error("Entry {kind}/{id} has invalid data: {reason}")]
    InvalidData {
        kind: ConfigurationType,
        id: String,
        reason: String,
    },

    /// Modification policy lookup or evaluation failed
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Signatures do not satisfy the modification policy
    #[error("Change to {kind}/{id} not authorized by policy {policy}")]
    Unauthorized {
        kind: ConfigurationType,
        id: String,
        policy: String,
    },

    /// Proposal was validated against a configuration that is no longer active
    #[error("Stale proposal: active sequence is {active}, proposal is {proposed}")]
    StaleProposal { active: u64, proposed: u64 },

    /// Encoding failed
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

impl ConfigError {
    /// Wire status for this error.
    pub fn status(&self) -> Status {
        match self {
            Self::Policy(e) => e.status(),
            Self::Unauthorized { .. } => Status::Forbidden,
            Self::WrongChain { .. }
            | Self::SequenceMismatch { .. }
            | Self::Empty
            | Self::MalformedEntry { .. }
            | Self::EntryChainMismatch { .. }
            | Self::EmptyField { .. }
            | Self::DuplicateEntry { .. }
            | Self::FutureModification { .. }
            | Self::UnchangedEntryDiffers { .. }
            | Self::MissingEntry { .. }
            | Self::MissingAnchor { .. }
            | Self::InvalidData { .. }
            | Self::StaleProposal { .. }
            | Self::Codec(_) => Status::BadRequest,
        }
    }
}
