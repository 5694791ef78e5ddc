//! # Status Codes
//!
//! The status vocabulary shared by both streams. Every foreseeable failure in
//! the core is converted into one of these before it reaches a client.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire status. Encoded as its numeric code, not as an enum index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Status {
    /// Accepted and committed.
    Success,
    /// Malformed input; rejected without side effects.
    BadRequest,
    /// Policy not satisfied.
    Forbidden,
    /// Unknown chain or block target.
    NotFound,
    /// Overloaded or not ready; safe to retry.
    ServiceUnavailable,
}

impl Status {
    /// Numeric wire code.
    pub const fn code(self) -> u16 {
        match self {
            Self::Success => 0,
            Self::BadRequest => 400,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::ServiceUnavailable => 503,
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            400 => Some(Self::BadRequest),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            503 => Some(Self::ServiceUnavailable),
            _ => None,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    /// Whether a client may resubmit the same message unchanged.
    pub fn is_retryable(self) -> bool {
        self == Self::ServiceUnavailable
    }
}

impl From<Status> for u16 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<u16> for Status {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Status::from_code(code).ok_or_else(|| format!("unknown status code {code}"))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "SUCCESS",
            Self::BadRequest => "BAD_REQUEST",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        };
        write!(f, "{}({})", name, self.code())
    }
}
