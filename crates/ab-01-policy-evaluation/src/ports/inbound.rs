//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::SignerSet;
use crate::domain::errors::PolicyError;
use shared_types::{Policy, SignedData};

/// Primary Policy Evaluation API
pub trait PolicyEvaluationApi: Send + Sync {
    /// Reject malformed policies (bad thresholds, unknown identity slots,
    /// excessive depth, unusable identities).
    fn validate(&self, policy: &Policy) -> Result<(), PolicyError>;

    /// Whether `signers` satisfy `policy`. Validates first.
    fn evaluate(&self, policy: &Policy, signers: &SignerSet) -> Result<bool, PolicyError>;

    /// Verify endorsements over `payload` and collect their signers.
    ///
    /// Endorsements that fail verification or sign a different payload are
    /// dropped, not reported: an unusable signature simply does not count.
    fn verify_signed_data(&self, signed: &[SignedData], payload: &[u8]) -> SignerSet;

    /// `evaluate(policy, signatures) -> bool` over raw endorsements.
    fn evaluate_signed(
        &self,
        policy: &Policy,
        signed: &[SignedData],
        payload: &[u8],
    ) -> Result<bool, PolicyError> {
        let signers = self.verify_signed_data(signed, payload);
        self.evaluate(policy, &signers)
    }
}
