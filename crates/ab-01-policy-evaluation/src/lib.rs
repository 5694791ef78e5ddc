//! # Policy Evaluation (AB-01)
//!
//! Decides whether a set of signers satisfies a recursive threshold policy.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): policy validation, signer sets, errors
//! - **Ports Layer** (`ports/`): the evaluation API and the signature scheme SPI
//! - **Application Layer** (`application/`): `PolicyEvaluator`, `PolicyManager`
//! - **Adapters** (`adapters/`): Ed25519 verification and signing
//!
//! ## Policy Language
//!
//! ```text
//! SignaturePolicy = SignedBy(identity index)
//!                 | NOutOf(N, [SignaturePolicy])
//! ```
//!
//! `NOutOf(0, [])` is always satisfied. A threshold larger than the child
//! count, a negative threshold or an unknown identity index is a malformed
//! policy and is rejected as `BAD_REQUEST`, never evaluated to `false`.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-export public API
pub use adapters::{sign_payload, Ed25519Verifier};
pub use application::{PolicyEvaluator, PolicyManager};
pub use config::PolicyConfig;
pub use domain::{validate_envelope, PolicyError, SignatureReuse, SignerSet, DEFAULT_MAX_DEPTH};
pub use ports::{PolicyEvaluationApi, SignatureVerifier};
