//! # Canonical Codec
//!
//! Every byte string that is signed or hashed is produced here, so the
//! encoding of a value never depends on the call site.
//!
//! Format: bincode, fixed-width little-endian integers, fields in declaration
//! order, trailing bytes rejected.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Upper bound for any message accepted at a stream boundary (1 MiB).
pub const MAX_MESSAGE_BYTES: u64 = 1024 * 1024;

/// Upper bound for an encoded policy. Keeps decoding of the recursive
/// policy type shallow enough to stay off the stack limit.
pub const MAX_POLICY_BYTES: u64 = 16 * 1024;

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Value could not be encoded.
    #[error("Encode failed: {0}")]
    Encode(String),

    /// Bytes are not a valid encoding of the requested type.
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Input exceeds the decode limit.
    #[error("Message too large: {size} > {max}")]
    TooLarge { size: u64, max: u64 },
}

fn options() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding()
}

/// Encode `value` canonically.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    options()
        .serialize(value)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode `bytes`, refusing inputs (and allocations) beyond `limit` bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], limit: u64) -> Result<T, CodecError> {
    let size = bytes.len() as u64;
    if size > limit {
        return Err(CodecError::TooLarge { size, max: limit });
    }
    options()
        .with_limit(limit)
        .deserialize(bytes)
        .map_err(|e| CodecError::Decode(e.to_string()))
}
