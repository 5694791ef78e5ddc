//! Syntactic validation of broadcast messages
//!
//! Runs on the producer's task before anything is enqueued, so a rejected
//! message never touches the ordering loop.

use super::errors::BroadcastError;
use shared_types::codec;
use shared_types::{BroadcastMessage, ChainId, Transaction, TransactionBody};

/// Decode and check a broadcast message.
pub fn validate_message(
    message: &BroadcastMessage,
    chain_id: &ChainId,
    max_message_bytes: u64,
) -> Result<Transaction, BroadcastError> {
    let size = message.data.len() as u64;
    if size == 0 {
        return Err(BroadcastError::EmptyMessage);
    }
    if size > max_message_bytes {
        return Err(BroadcastError::TooLarge {
            size,
            max: max_message_bytes,
        });
    }

    let transaction: Transaction = codec::decode(&message.data, max_message_bytes)
        .map_err(|e| BroadcastError::Malformed(e.to_string()))?;

    match &transaction.body {
        TransactionBody::Opaque(payload) if payload.is_empty() => {
            return Err(BroadcastError::EmptyPayload)
        }
        TransactionBody::Opaque(_) => {}
        TransactionBody::ConfigurationEnvelope(envelope) => {
            if &envelope.chain_id != chain_id {
                return Err(BroadcastError::WrongChain {
                    expected: chain_id.to_string(),
                    got: envelope.chain_id.to_string(),
                });
            }
        }
    }
    Ok(transaction)
}
