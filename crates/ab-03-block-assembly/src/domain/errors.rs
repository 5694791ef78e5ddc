//! Error types for block assembly

use shared_types::{CodecError, Hash, Status};
use thiserror::Error;

/// Errors raised while building, appending or reading blocks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// Block number does not follow the tip
    #[error("Block number mismatch: expected {expected}, got {got}")]
    NumberMismatch { expected: u64, got: u64 },

    /// PreviousHash does not match the hash of the tip header
    #[error("Broken link at block {number}: expected {expected:02x?}, got {got:02x?}")]
    LinkMismatch { number: u64, expected: Hash, got: Hash },

    /// DataHash does not match the block data
    #[error("Data hash mismatch at block {number}")]
    DataHashMismatch { number: u64 },

    /// No block at this number
    #[error("Block {number} not found")]
    UnknownBlock { number: u64 },

    /// The writer side of the ledger has gone away
    #[error("Ledger closed")]
    LedgerClosed,

    /// Encoding failed
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

impl AssemblyError {
    /// A broken chain invariant. The chain must stop producing blocks.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NumberMismatch { .. } | Self::LinkMismatch { .. } | Self::DataHashMismatch { .. }
        )
    }

    /// Wire status for this error.
    pub fn status(&self) -> Status {
        match self {
            Self::UnknownBlock { .. } => Status::NotFound,
            Self::Codec(_) => Status::BadRequest,
            Self::NumberMismatch { .. }
            | Self::LinkMismatch { .. }
            | Self::DataHashMismatch { .. }
            | Self::LedgerClosed => Status::ServiceUnavailable,
        }
    }
}
