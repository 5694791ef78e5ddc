//! Ed25519 adapter for [`SignatureVerifier`]
//!
//! Identities are raw 32-byte public keys. The signed message is the encoded
//! `PayloadEnvelope`, exactly as carried in `SignedData.payload_envelope`.

use crate::ports::outbound::SignatureVerifier;
use shared_crypto::{CryptoError, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use shared_types::{CodecError, PayloadEnvelope, SignedData};

/// Production verifier backed by `ed25519-dalek` strict verification.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, signer: &[u8], message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let key = Ed25519PublicKey::from_slice(signer)?;
        let signature = Ed25519Signature::from_slice(signature)?;
        key.verify(message, &signature)
    }

    fn is_valid_identity(&self, identity: &[u8]) -> bool {
        Ed25519PublicKey::from_slice(identity).is_ok()
    }
}

/// Endorse `payload` with `keypair`, binding the signer identity into the
/// signed bytes.
pub fn sign_payload(keypair: &Ed25519KeyPair, payload: &[u8]) -> Result<SignedData, CodecError> {
    let envelope = PayloadEnvelope {
        payload: payload.to_vec(),
        signer: keypair.public_key().as_bytes().to_vec(),
    };
    let payload_envelope = envelope.to_bytes()?;
    let signature = keypair.sign(&payload_envelope);
    Ok(SignedData {
        payload_envelope,
        signature: signature.as_bytes().to_vec(),
    })
}
