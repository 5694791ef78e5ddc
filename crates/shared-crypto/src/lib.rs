//! # Shared Crypto - Hashing and Signatures
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256, BLAKE3 | Block header and data hashes |
//! | `signatures` | Ed25519 | Endorsements on configuration updates |
//!
//! The ordering core only combines and checks the outputs of these
//! primitives; it never depends on their internals.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{blake3_hash, sha256, ChainHasher, Hash, HashAlgorithm};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
