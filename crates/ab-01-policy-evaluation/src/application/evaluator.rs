//! # Policy Evaluator Service
//!
//! Implements [`PolicyEvaluationApi`] over a pluggable [`SignatureVerifier`].
//!
//! Evaluation runs in two phases:
//! 1. `verify_signed_data` turns raw endorsements into a [`SignerSet`]
//!    (each signature is verified once)
//! 2. `evaluate` walks the policy tree against that set
//!
//! A malformed tree is reported as [`PolicyError`] before any evaluation.

use crate::config::PolicyConfig;
use crate::domain::entities::{SignatureReuse, SignerSet};
use crate::domain::errors::PolicyError;
use crate::domain::validation::validate_envelope;
use crate::ports::inbound::PolicyEvaluationApi;
use crate::ports::outbound::SignatureVerifier;
use shared_types::codec;
use shared_types::{
    PayloadEnvelope, Policy, SignaturePolicy, SignedData, MAX_MESSAGE_BYTES, MAX_POLICY_BYTES,
};
use std::sync::Arc;
use tracing::debug;

/// Policy evaluator.
#[derive(Clone)]
pub struct PolicyEvaluator {
    verifier: Arc<dyn SignatureVerifier>,
    config: PolicyConfig,
}

impl PolicyEvaluator {
    pub fn new(verifier: Arc<dyn SignatureVerifier>, config: PolicyConfig) -> Self {
        Self { verifier, config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Decode policy bytes as carried in a `Policy` configuration item.
    pub fn decode_policy(&self, bytes: &[u8]) -> Result<Policy, PolicyError> {
        codec::decode(bytes, MAX_POLICY_BYTES).map_err(|e| PolicyError::Decode(e.to_string()))
    }

    /// Decode and validate in one step.
    pub fn parse_policy(&self, bytes: &[u8]) -> Result<Policy, PolicyError> {
        let policy = self.decode_policy(bytes)?;
        self.validate(&policy)?;
        Ok(policy)
    }
}

impl PolicyEvaluationApi for PolicyEvaluator {
    fn validate(&self, policy: &Policy) -> Result<(), PolicyError> {
        match policy {
            Policy::Signature(envelope) => {
                validate_envelope(envelope, self.config.max_depth)?;
                for (index, identity) in envelope.identities.iter().enumerate() {
                    if !self.verifier.is_valid_identity(identity) {
                        return Err(PolicyError::InvalidIdentity { index });
                    }
                }
                Ok(())
            }
        }
    }

    fn evaluate(&self, policy: &Policy, signers: &SignerSet) -> Result<bool, PolicyError> {
        self.validate(policy)?;
        let Policy::Signature(envelope) = policy;

        let satisfied = match self.config.signature_reuse {
            SignatureReuse::Shared => eval_shared(&envelope.policy, &envelope.identities, signers),
            SignatureReuse::Exclusive => {
                let mut used = vec![false; signers.len()];
                eval_exclusive(&envelope.policy, &envelope.identities, signers, &mut used)
            }
        };

        debug!(
            signers = signers.len(),
            satisfied,
            reuse = ?self.config.signature_reuse,
            "Policy evaluated"
        );
        Ok(satisfied)
    }

    fn verify_signed_data(&self, signed: &[SignedData], payload: &[u8]) -> SignerSet {
        let mut signers = SignerSet::new();
        for (position, item) in signed.iter().enumerate() {
            let envelope: PayloadEnvelope =
                match codec::decode(&item.payload_envelope, MAX_MESSAGE_BYTES) {
                    Ok(envelope) => envelope,
                    Err(e) => {
                        debug!(position, error = %e, "Ignoring undecodable endorsement");
                        continue;
                    }
                };

            if envelope.payload != payload {
                debug!(position, "Ignoring endorsement over a different payload");
                continue;
            }

            match self
                .verifier
                .verify(&envelope.signer, &item.payload_envelope, &item.signature)
            {
                Ok(()) => {
                    signers.insert(envelope.signer);
                }
                Err(e) => debug!(position, error = %e, "Ignoring invalid endorsement"),
            }
        }
        signers
    }
}

fn identity_at(identities: &[Vec<u8>], index: i32) -> Option<&[u8]> {
    usize::try_from(index)
        .ok()
        .and_then(|i| identities.get(i))
        .map(Vec::as_slice)
}

/// Every leaf sees the whole signer set.
fn eval_shared(node: &SignaturePolicy, identities: &[Vec<u8>], signers: &SignerSet) -> bool {
    match node {
        SignaturePolicy::SignedBy(index) => {
            identity_at(identities, *index).is_some_and(|identity| signers.contains(identity))
        }
        SignaturePolicy::NOutOf { n, policies } => {
            let needed = usize::try_from(*n).unwrap_or(usize::MAX);
            policies
                .iter()
                .filter(|child| eval_shared(child, identities, signers))
                .take(needed)
                .count()
                >= needed
        }
    }
}

/// Each signer may satisfy one leaf. Assignment is greedy: children are
/// tried left to right and the first leaf a signer satisfies keeps it, so a
/// policy some other assignment would satisfy can evaluate false. No
/// backtracking over satisfied children is attempted.
///
/// `used` is indexed like `signers.identities()` and only keeps consumption
/// of satisfied subtrees.
fn eval_exclusive(
    node: &SignaturePolicy,
    identities: &[Vec<u8>],
    signers: &SignerSet,
    used: &mut [bool],
) -> bool {
    match node {
        SignaturePolicy::SignedBy(index) => {
            let Some(identity) = identity_at(identities, *index) else {
                return false;
            };
            let slot = signers
                .identities()
                .iter()
                .enumerate()
                .position(|(i, signer)| !used[i] && signer.as_slice() == identity);
            match slot {
                Some(i) => {
                    used[i] = true;
                    true
                }
                None => false,
            }
        }
        SignaturePolicy::NOutOf { n, policies } => {
            let needed = usize::try_from(*n).unwrap_or(usize::MAX);
            if needed == 0 {
                return true;
            }

            let before = used.to_vec();
            let mut satisfied = 0;
            for child in policies {
                let mut trial = used.to_vec();
                if eval_exclusive(child, identities, signers, &mut trial) {
                    used.copy_from_slice(&trial);
                    satisfied += 1;
                    if satisfied >= needed {
                        return true;
                    }
                }
            }
            used.copy_from_slice(&before);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ed25519::{sign_payload, Ed25519Verifier};
    use crate::ports::outbound::mocks::EchoVerifier;
    use proptest::prelude::*;
    use shared_crypto::Ed25519KeyPair;
    use shared_types::SignaturePolicyEnvelope;

    fn evaluator(reuse: SignatureReuse) -> PolicyEvaluator {
        PolicyEvaluator::new(
            Arc::new(EchoVerifier),
            PolicyConfig {
                signature_reuse: reuse,
                ..PolicyConfig::default()
            },
        )
    }

    fn identity(i: u8) -> Vec<u8> {
        vec![i; 4]
    }

    fn policy(tree: SignaturePolicy, identities: u8) -> Policy {
        Policy::Signature(SignaturePolicyEnvelope {
            version: 0,
            policy: tree,
            identities: (0..identities).map(identity).collect(),
        })
    }

    fn signers(ids: &[u8]) -> SignerSet {
        SignerSet::from_identities(ids.iter().map(|i| identity(*i)))
    }

    #[test]
    fn test_signed_by() {
        let eval = evaluator(SignatureReuse::Shared);
        let p = policy(SignaturePolicy::signed_by(1), 2);
        assert!(eval.evaluate(&p, &signers(&[1])).unwrap());
        assert!(!eval.evaluate(&p, &signers(&[0])).unwrap());
        assert!(!eval.evaluate(&p, &SignerSet::new()).unwrap());
    }

    #[test]
    fn test_two_of_three() {
        let eval = evaluator(SignatureReuse::Shared);
        let tree = SignaturePolicy::n_out_of(
            2,
            vec![
                SignaturePolicy::signed_by(0),
                SignaturePolicy::signed_by(1),
                SignaturePolicy::signed_by(2),
            ],
        );
        let p = policy(tree, 3);
        assert!(eval.evaluate(&p, &signers(&[0, 2])).unwrap());
        assert!(!eval.evaluate(&p, &signers(&[1])).unwrap());
    }

    #[test]
    fn test_vacuous_threshold_is_true() {
        let eval = evaluator(SignatureReuse::Shared);
        let p = policy(SignaturePolicy::n_out_of(0, vec![]), 0);
        assert!(eval.evaluate(&p, &SignerSet::new()).unwrap());

        let eval = evaluator(SignatureReuse::Exclusive);
        assert!(eval.evaluate(&p, &SignerSet::new()).unwrap());
    }

    #[test]
    fn test_malformed_policy_is_error_not_false() {
        let eval = evaluator(SignatureReuse::Shared);
        let p = policy(
            SignaturePolicy::n_out_of(2, vec![SignaturePolicy::signed_by(0)]),
            1,
        );
        let err = eval.evaluate(&p, &signers(&[0])).unwrap_err();
        assert_eq!(err.status(), shared_types::Status::BadRequest);
    }

    #[test]
    fn test_invalid_identity_rejected() {
        let eval = evaluator(SignatureReuse::Shared);
        let p = Policy::Signature(SignaturePolicyEnvelope {
            version: 0,
            policy: SignaturePolicy::signed_by(0),
            identities: vec![vec![]],
        });
        assert_eq!(
            eval.validate(&p),
            Err(PolicyError::InvalidIdentity { index: 0 })
        );
    }

    #[test]
    fn test_reuse_modes_differ_on_duplicate_leaves() {
        // Same identity referenced twice; one signer
        let tree = SignaturePolicy::n_out_of(
            2,
            vec![SignaturePolicy::signed_by(0), SignaturePolicy::signed_by(0)],
        );
        let p = policy(tree, 1);

        assert!(evaluator(SignatureReuse::Shared)
            .evaluate(&p, &signers(&[0]))
            .unwrap());
        assert!(!evaluator(SignatureReuse::Exclusive)
            .evaluate(&p, &signers(&[0]))
            .unwrap());
    }

    #[test]
    fn test_exclusive_failed_child_releases_signers() {
        // Child 0 needs 0 and 1 but only 0 signed; child 1 needs 0.
        // The failed first child must not keep identity 0 consumed.
        let tree = SignaturePolicy::n_out_of(
            1,
            vec![
                SignaturePolicy::n_out_of(
                    2,
                    vec![SignaturePolicy::signed_by(0), SignaturePolicy::signed_by(1)],
                ),
                SignaturePolicy::signed_by(0),
            ],
        );
        let p = policy(tree, 2);
        assert!(evaluator(SignatureReuse::Exclusive)
            .evaluate(&p, &signers(&[0]))
            .unwrap());
    }

    #[test]
    fn test_exclusive_assignment_is_greedy() {
        // Satisfiable with 1 -> inner and 0 -> outer leaf, but the inner
        // threshold takes 0 first and the outer leaf finds it consumed
        let tree = SignaturePolicy::n_out_of(
            2,
            vec![
                SignaturePolicy::n_out_of(
                    1,
                    vec![SignaturePolicy::signed_by(0), SignaturePolicy::signed_by(1)],
                ),
                SignaturePolicy::signed_by(0),
            ],
        );
        let p = policy(tree, 2);

        assert!(!evaluator(SignatureReuse::Exclusive)
            .evaluate(&p, &signers(&[0, 1]))
            .unwrap());
        assert!(evaluator(SignatureReuse::Shared)
            .evaluate(&p, &signers(&[0, 1]))
            .unwrap());
    }

    #[test]
    fn test_verify_signed_data_with_ed25519() {
        let alice = Ed25519KeyPair::from_seed([1u8; 32]);
        let bob = Ed25519KeyPair::from_seed([2u8; 32]);
        let eval = PolicyEvaluator::new(Arc::new(Ed25519Verifier), PolicyConfig::default());

        let good = sign_payload(&alice, b"payload").unwrap();
        let other_payload = sign_payload(&bob, b"something else").unwrap();
        let mut forged = sign_payload(&bob, b"payload").unwrap();
        forged.signature[0] ^= 1;

        let set = eval.verify_signed_data(&[good, other_payload, forged], b"payload");
        assert_eq!(set.len(), 1);
        assert!(set.contains(alice.public_key().as_bytes()));
    }

    #[test]
    fn test_evaluate_signed_end_to_end() {
        let alice = Ed25519KeyPair::from_seed([1u8; 32]);
        let bob = Ed25519KeyPair::from_seed([2u8; 32]);
        let eval = PolicyEvaluator::new(Arc::new(Ed25519Verifier), PolicyConfig::default());

        let p = Policy::Signature(SignaturePolicyEnvelope {
            version: 0,
            policy: SignaturePolicy::n_out_of(
                2,
                vec![SignaturePolicy::signed_by(0), SignaturePolicy::signed_by(1)],
            ),
            identities: vec![
                alice.public_key().as_bytes().to_vec(),
                bob.public_key().as_bytes().to_vec(),
            ],
        });

        let a = sign_payload(&alice, b"update").unwrap();
        let b = sign_payload(&bob, b"update").unwrap();
        assert!(!eval.evaluate_signed(&p, &[a.clone()], b"update").unwrap());
        assert!(eval.evaluate_signed(&p, &[a, b], b"update").unwrap());
    }

    #[test]
    fn test_decode_policy_rejects_garbage() {
        let eval = evaluator(SignatureReuse::Shared);
        assert!(matches!(
            eval.decode_policy(&[0xFF; 7]),
            Err(PolicyError::Decode(_))
        ));

        let oversized = vec![0u8; (MAX_POLICY_BYTES + 1) as usize];
        assert!(matches!(
            eval.decode_policy(&oversized),
            Err(PolicyError::Decode(_))
        ));
    }

    #[test]
    fn test_parse_policy_roundtrip() {
        let eval = evaluator(SignatureReuse::Shared);
        let p = policy(SignaturePolicy::signed_by(0), 1);
        let bytes = codec::encode(&p).unwrap();
        assert_eq!(eval.parse_policy(&bytes).unwrap(), p);
    }

    proptest! {
        /// NOutOf over plain leaves holds iff at least n leaves hold, in both modes.
        #[test]
        fn prop_threshold_counts_children(
            mask in proptest::collection::vec(any::<bool>(), 0..8),
            n_seed in any::<usize>(),
            exclusive in any::<bool>(),
        ) {
            let k = mask.len();
            let n = n_seed % (k + 1);
            let tree = SignaturePolicy::n_out_of(
                n as i32,
                (0..k as i32).map(SignaturePolicy::signed_by).collect(),
            );
            let p = policy(tree, k as u8);
            let present: Vec<u8> = mask
                .iter()
                .enumerate()
                .filter(|(_, m)| **m)
                .map(|(i, _)| i as u8)
                .collect();

            let reuse = if exclusive { SignatureReuse::Exclusive } else { SignatureReuse::Shared };
            let result = evaluator(reuse).evaluate(&p, &signers(&present)).unwrap();
            prop_assert_eq!(result, present.len() >= n);
        }
    }
}
