//! Error types for Deliver sessions

use shared_types::Status;
use thiserror::Error;

/// Reasons a Deliver session is closed with an error response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliverError {
    /// `SeekInfo.WindowSize` is zero
    #[error("Window size must be positive")]
    ZeroWindow,

    /// Acknowledgement received with no seek in force
    #[error("Acknowledgement before seek")]
    AckBeforeSeek,

    /// `SeekInfo.ChainID` names no chain served here
    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    /// Update received after the session closed
    #[error("Session closed")]
    Closed,
}

impl DeliverError {
    /// Wire status for this error.
    pub fn status(&self) -> Status {
        match self {
            Self::UnknownChain(_) => Status::NotFound,
            Self::ZeroWindow | Self::AckBeforeSeek | Self::Closed => Status::BadRequest,
        }
    }
}
