//! Inbound Ports (Driving Ports / API)

use crate::application::sequencer::Ticket;
use shared_types::{BroadcastMessage, ChainId};

/// Admission into one chain's total order.
pub trait BroadcastApi: Send + Sync {
    /// Chain this API orders for.
    fn chain_id(&self) -> &ChainId;

    /// Validate and enqueue a message without waiting for its block.
    ///
    /// The returned ticket resolves once the outcome is known: immediately
    /// for rejected messages, after the block commits for admitted ones.
    fn submit(&self, message: &BroadcastMessage) -> Ticket;
}
