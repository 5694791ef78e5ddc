//! # Broadcast Stream Handler
//!
//! Serves one producer stream: every inbound `BroadcastMessage` gets exactly
//! one `BroadcastResponse`, in the order the messages arrived.
//!
//! Messages are pipelined: up to `max_in_flight` may await their block at
//! once. Responses come out of a `FuturesOrdered`, so a message admitted
//! later but resolved earlier (a rejection) still waits its turn.

use crate::config::BroadcastConfig;
use crate::ports::inbound::BroadcastApi;
use futures::stream::{FuturesOrdered, StreamExt};
use shared_bus::{MessageStream, StreamError};
use shared_types::{BroadcastMessage, BroadcastResponse};
use std::sync::Arc;
use tracing::{debug, info};

/// Broadcast handler for one chain.
#[derive(Clone)]
pub struct BroadcastHandler {
    api: Arc<dyn BroadcastApi>,
    max_in_flight: usize,
}

impl BroadcastHandler {
    pub fn new(api: Arc<dyn BroadcastApi>, config: &BroadcastConfig) -> Self {
        Self {
            api,
            max_in_flight: config.max_in_flight.max(1),
        }
    }

    /// Serve `stream` until the producer finishes and every response is sent.
    ///
    /// Returns `Err` if the stream fails; messages already enqueued are still
    /// ordered, their responses are dropped.
    pub async fn handle<S>(&self, stream: &mut S) -> Result<(), StreamError>
    where
        S: MessageStream<BroadcastMessage, BroadcastResponse>,
    {
        let chain_id = self.api.chain_id().clone();
        debug!(chain_id = %chain_id, "Broadcast stream opened");

        let mut in_flight = FuturesOrdered::new();
        let mut inbound_done = false;
        let mut received = 0u64;

        loop {
            tokio::select! {
                Some(status) = in_flight.next(), if !in_flight.is_empty() => {
                    stream.send(BroadcastResponse { status }).await?;
                }
                message = stream.recv(), if !inbound_done && in_flight.len() < self.max_in_flight => {
                    match message? {
                        Some(message) => {
                            received += 1;
                            in_flight.push_back(self.api.submit(&message).status());
                        }
                        None => inbound_done = true,
                    }
                }
                else => break,
            }
        }

        info!(chain_id = %chain_id, messages = received, "Broadcast stream closed");
        Ok(())
    }
}
