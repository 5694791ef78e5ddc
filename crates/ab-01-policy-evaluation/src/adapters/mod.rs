//! Adapters for the policy evaluation ports

pub mod ed25519;

pub use ed25519::{sign_payload, Ed25519Verifier};
