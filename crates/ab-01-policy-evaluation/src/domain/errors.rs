//! Error types for policy evaluation

use shared_types::Status;
use thiserror::Error;

/// All errors that can occur while decoding, validating or evaluating a policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Threshold is negative
    #[error("Negative threshold: {n}")]
    NegativeThreshold { n: i32 },

    /// Threshold can never be met
    #[error("Threshold {n} exceeds child count {children}")]
    ThresholdExceedsChildren { n: i32, children: usize },

    /// `SignedBy` refers to an identity that is not registered
    #[error("Identity index {index} out of range ({registered} registered)")]
    IdentityIndexOutOfRange { index: i32, registered: usize },

    /// Registered identity is not a usable public key
    #[error("Registered identity {index} is not a valid public key")]
    InvalidIdentity { index: usize },

    /// Policy tree nested beyond the configured limit
    #[error("Policy too deep: {depth} > {max}")]
    TooDeep { depth: usize, max: usize },

    /// Policy bytes failed to decode
    #[error("Policy decode failed: {0}")]
    Decode(String),

    /// A named policy does not exist
    #[error("Unknown policy: {0}")]
    UnknownPolicy(String),
}

impl PolicyError {
    /// Wire status for this error.
    pub fn status(&self) -> Status {
        match self {
            Self::UnknownPolicy(_) => Status::Forbidden,
            Self::NegativeThreshold { .. }
            | Self::ThresholdExceedsChildren { .. }
            | Self::IdentityIndexOutOfRange { .. }
            | Self::InvalidIdentity { .. }
            | Self::TooDeep { .. }
            | Self::Decode(_) => Status::BadRequest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PolicyError::ThresholdExceedsChildren { n: 3, children: 2 };
        assert_eq!(err.to_string(), "Threshold 3 exceeds child count 2");
    }

    #[test]
    fn test_malformed_policies_are_bad_requests() {
        assert_eq!(
            PolicyError::NegativeThreshold { n: -1 }.status(),
            Status::BadRequest
        );
        assert_eq!(
            PolicyError::TooDeep { depth: 40, max: 32 }.status(),
            Status::BadRequest
        );
    }

    #[test]
    fn test_unknown_policy_is_forbidden() {
        assert_eq!(
            PolicyError::UnknownPolicy("Admins".into()).status(),
            Status::Forbidden
        );
    }
}
