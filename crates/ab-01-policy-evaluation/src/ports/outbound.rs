//! Outbound Ports (Driven Ports / SPI)

use shared_crypto::CryptoError;

/// Signature scheme behind identity checks.
///
/// Production: `Ed25519Verifier` (adapters/ed25519.rs)
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` over `message` by `signer` (wire identity bytes).
    fn verify(&self, signer: &[u8], message: &[u8], signature: &[u8]) -> Result<(), CryptoError>;

    /// Whether `identity` is a usable public key for this scheme.
    fn is_valid_identity(&self, identity: &[u8]) -> bool;
}
