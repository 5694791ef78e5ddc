//! Structural validation of signature policy trees
//!
//! A policy must pass these checks before it is evaluated or admitted into
//! configuration. A malformed tree is a rejected request, never a panic.

use super::errors::PolicyError;
use shared_types::{SignaturePolicy, SignaturePolicyEnvelope};

/// Default nesting limit for policy trees.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Check thresholds, identity indices and depth of the whole tree.
pub fn validate_envelope(
    envelope: &SignaturePolicyEnvelope,
    max_depth: usize,
) -> Result<(), PolicyError> {
    validate_node(&envelope.policy, envelope.identities.len(), 1, max_depth)
}

fn validate_node(
    node: &SignaturePolicy,
    registered: usize,
    depth: usize,
    max_depth: usize,
) -> Result<(), PolicyError> {
    // Checked before descending so a hostile tree cannot drive deep recursion
    if depth > max_depth {
        return Err(PolicyError::TooDeep {
            depth,
            max: max_depth,
        });
    }

    match node {
        SignaturePolicy::SignedBy(index) => {
            if *index < 0 || *index as usize >= registered {
                return Err(PolicyError::IdentityIndexOutOfRange {
                    index: *index,
                    registered,
                });
            }
            Ok(())
        }
        SignaturePolicy::NOutOf { n, policies } => {
            if *n < 0 {
                return Err(PolicyError::NegativeThreshold { n: *n });
            }
            if *n as usize > policies.len() {
                return Err(PolicyError::ThresholdExceedsChildren {
                    n: *n,
                    children: policies.len(),
                });
            }
            for child in policies {
                validate_node(child, registered, depth + 1, max_depth)?;
            }
            Ok(())
        }
    }
}
