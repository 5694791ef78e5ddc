//! Canonical block hashing
//!
//! ```text
//! header_hash = H(number as u64 BE || previous_hash || data_hash)
//! data_hash   = H(len(d0) as u64 BE || d0 || len(d1) as u64 BE || d1 || ...)
//! ```
//!
//! Length prefixes make the data hash unambiguous: `["ab", "c"]` and
//! `["a", "bc"]` hash differently. Metadata is never hashed.

use shared_crypto::HashAlgorithm;
use shared_types::{BlockData, BlockHeader, Hash};

/// Hash of a block header, the value the next block links to.
pub fn header_hash(algorithm: HashAlgorithm, header: &BlockHeader) -> Hash {
    let mut hasher = algorithm.hasher();
    hasher
        .update(&header.number.to_be_bytes())
        .update(&header.previous_hash)
        .update(&header.data_hash);
    hasher.finalize()
}

/// Order-sensitive hash over block data.
pub fn data_hash(algorithm: HashAlgorithm, data: &BlockData) -> Hash {
    let mut hasher = algorithm.hasher();
    for item in &data.data {
        hasher
            .update(&(item.len() as u64).to_be_bytes())
            .update(item);
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::sha256;
    use shared_types::ZERO_HASH;

    fn data(items: &[&[u8]]) -> BlockData {
        BlockData {
            data: items.iter().map(|i| i.to_vec()).collect(),
        }
    }

    #[test]
    fn test_data_hash_is_order_sensitive() {
        let a = data(&[b"one", b"two"]);
        let b = data(&[b"two", b"one"]);
        assert_ne!(
            data_hash(HashAlgorithm::Sha256, &a),
            data_hash(HashAlgorithm::Sha256, &b)
        );
    }

    #[test]
    fn test_data_hash_is_unambiguous() {
        let a = data(&[b"ab", b"c"]);
        let b = data(&[b"a", b"bc"]);
        assert_ne!(
            data_hash(HashAlgorithm::Sha256, &a),
            data_hash(HashAlgorithm::Sha256, &b)
        );
    }

    #[test]
    fn test_empty_data_hash_is_hash_of_nothing() {
        assert_eq!(data_hash(HashAlgorithm::Sha256, &data(&[])), sha256(b""));
    }

    #[test]
    fn test_header_hash_layout() {
        let header = BlockHeader {
            number: 1,
            previous_hash: ZERO_HASH,
            data_hash: [7u8; 32],
        };
        let mut preimage = 1u64.to_be_bytes().to_vec();
        preimage.extend_from_slice(&ZERO_HASH);
        preimage.extend_from_slice(&[7u8; 32]);
        assert_eq!(header_hash(HashAlgorithm::Sha256, &header), sha256(&preimage));
    }

    #[test]
    fn test_algorithm_changes_hash() {
        let header = BlockHeader {
            number: 0,
            previous_hash: ZERO_HASH,
            data_hash: ZERO_HASH,
        };
        assert_ne!(
            header_hash(HashAlgorithm::Sha256, &header),
            header_hash(HashAlgorithm::Blake3, &header)
        );
    }
}
