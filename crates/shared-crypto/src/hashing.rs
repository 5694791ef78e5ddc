//! # Hashing
//!
//! Digest functions used for block chaining.
//!
//! ## Algorithms
//!
//! | Algorithm | Speed | Use Case |
//! |-----------|-------|----------|
//! | SHA-256 | ~500 MB/s | Default, interoperable |
//! | BLAKE3 | ~3000 MB/s | Internal deployments |
//!
//! Every chain uses exactly one algorithm for its whole lifetime; mixing
//! them would break `PreviousHash` linkage.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// 256-bit digest.
pub type Hash = [u8; 32];

/// Digest algorithm selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256.
    #[default]
    #[serde(rename = "sha256")]
    Sha256,

    /// BLAKE3.
    #[serde(rename = "blake3")]
    Blake3,
}

impl HashAlgorithm {
    /// Parse a config string (`sha256` / `blake3`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Some(Self::Sha256),
            "blake3" => Some(Self::Blake3),
            _ => None,
        }
    }

    /// Start an incremental hash.
    pub fn hasher(self) -> ChainHasher {
        match self {
            Self::Sha256 => ChainHasher::Sha256(Sha256::new()),
            Self::Blake3 => ChainHasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    /// One-shot digest.
    pub fn digest(self, data: &[u8]) -> Hash {
        let mut hasher = self.hasher();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Incremental hasher over the selected algorithm.
pub enum ChainHasher {
    /// SHA-256 state.
    Sha256(Sha256),
    /// BLAKE3 state (boxed, it is large).
    Blake3(Box<blake3::Hasher>),
}

impl ChainHasher {
    /// Feed data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        match self {
            Self::Sha256(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
        self
    }

    /// Finish and return the digest.
    pub fn finalize(self) -> Hash {
        match self {
            Self::Sha256(h) => {
                let mut output = [0u8; 32];
                output.copy_from_slice(&h.finalize());
                output
            }
            Self::Blake3(h) => *h.finalize().as_bytes(),
        }
    }
}

/// SHA-256 of `data`.
#[inline]
pub fn sha256(data: &[u8]) -> Hash {
    HashAlgorithm::Sha256.digest(data)
}

/// BLAKE3 of `data`.
#[inline]
pub fn blake3_hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}
