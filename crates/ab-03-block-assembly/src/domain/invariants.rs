//! Chain invariants
//!
//! For every block `i`:
//! - `Number == i`
//! - `PreviousHash == header_hash(block[i-1].header)`, all-zero for genesis
//! - `DataHash == data_hash(block[i].data)`
//!
//! A violation is fatal for the chain.

use super::errors::AssemblyError;
use super::hashing::{data_hash, header_hash};
use shared_crypto::HashAlgorithm;
use shared_types::{Block, BlockData, BlockHeader, BlockMetadata, ZERO_HASH};
use std::sync::Arc;

/// Build the block following `tip` (genesis when `tip` is `None`).
pub fn next_block(
    algorithm: HashAlgorithm,
    tip: Option<&BlockHeader>,
    data: Vec<Vec<u8>>,
) -> Block {
    let data = BlockData { data };
    let (number, previous_hash) = match tip {
        Some(header) => (header.number + 1, header_hash(algorithm, header)),
        None => (0, ZERO_HASH),
    };
    Block {
        header: BlockHeader {
            number,
            previous_hash,
            data_hash: data_hash(algorithm, &data),
        },
        data,
        metadata: BlockMetadata::default(),
    }
}

/// Check that `block` may be appended after `tip`.
pub fn check_link(
    algorithm: HashAlgorithm,
    tip: Option<&BlockHeader>,
    block: &Block,
) -> Result<(), AssemblyError> {
    let (expected_number, expected_previous) = match tip {
        Some(header) => (header.number + 1, header_hash(algorithm, header)),
        None => (0, ZERO_HASH),
    };

    if block.header.number != expected_number {
        return Err(AssemblyError::NumberMismatch {
            expected: expected_number,
            got: block.header.number,
        });
    }
    if block.header.previous_hash != expected_previous {
        return Err(AssemblyError::LinkMismatch {
            number: block.header.number,
            expected: expected_previous,
            got: block.header.previous_hash,
        });
    }
    if block.header.data_hash != data_hash(algorithm, &block.data) {
        return Err(AssemblyError::DataHashMismatch {
            number: block.header.number,
        });
    }
    Ok(())
}

/// Verify numbering, links and data hashes of a whole chain, genesis first.
pub fn verify_chain(algorithm: HashAlgorithm, blocks: &[Arc<Block>]) -> Result<(), AssemblyError> {
    let mut tip: Option<&BlockHeader> = None;
    for block in blocks {
        check_link(algorithm, tip, block)?;
        tip = Some(&block.header);
    }
    Ok(())
}
