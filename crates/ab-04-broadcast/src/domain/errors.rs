//! Error types for broadcast ingestion

use ab_02_configuration::ConfigError;
use ab_03_block_assembly::AssemblyError;
use shared_types::Status;
use thiserror::Error;

/// Reasons a broadcast message is not ordered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    /// `Data` is empty
    #[error("Empty message")]
    EmptyMessage,

    /// `Data` exceeds the size limit
    #[error("Message too large: {size} > {max}")]
    TooLarge { size: u64, max: u64 },

    /// `Data` is not a transaction
    #[error("Malformed transaction: {0}")]
    Malformed(String),

    /// Opaque transaction without payload
    #[error("Empty transaction payload")]
    EmptyPayload,

    /// Configuration transaction for another chain
    #[error("Configuration targets chain {got}, this is {expected}")]
    WrongChain { expected: String, got: String },

    /// Configuration update rejected
    #[error("Configuration rejected: {0}")]
    Config(#[from] ConfigError),

    /// Ordering queue is full
    #[error("Ordering queue full")]
    QueueFull,

    /// Chain stopped after a fatal error
    #[error("Chain halted")]
    Halted,

    /// Block could not be committed
    #[error("Assembly failed: {0}")]
    Assembly(#[from] AssemblyError),
}

impl BroadcastError {
    /// Wire status for this error.
    pub fn status(&self) -> Status {
        match self {
            Self::Config(e) => e.status(),
            Self::QueueFull | Self::Halted | Self::Assembly(_) => Status::ServiceUnavailable,
            Self::EmptyMessage
            | Self::TooLarge { .. }
            | Self::Malformed(_)
            | Self::EmptyPayload
            | Self::WrongChain { .. } => Status::BadRequest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overload_is_retryable() {
        assert!(BroadcastError::QueueFull.status().is_retryable());
        assert!(BroadcastError::Halted.status().is_retryable());
        assert!(!BroadcastError::EmptyMessage.status().is_retryable());
    }

    #[test]
    fn test_config_status_passes_through() {
        let err: BroadcastError = ConfigError::SequenceMismatch {
            expected: 1,
            got: 5,
        }
        .into();
        assert_eq!(err.status(), Status::BadRequest);
    }
}
