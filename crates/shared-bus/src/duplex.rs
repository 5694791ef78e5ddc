//! # Duplex Streams
//!
//! A bidirectional message stream: inbound messages in, outbound messages
//! out. Broadcast and Deliver handlers are written against
//! [`MessageStream`] only, so they run unchanged over an RPC transport or an
//! in-process channel pair.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Errors from stream operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The peer went away; nothing more can be sent.
    #[error("Stream closed by peer")]
    Closed,

    /// The transport failed mid-stream.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Server-side view of one bidirectional stream.
#[async_trait]
pub trait MessageStream<In, Out>: Send
where
    In: Send + 'static,
    Out: Send + 'static,
{
    /// Next inbound message.
    ///
    /// - `Ok(Some(msg))` - a message arrived
    /// - `Ok(None)` - the peer finished sending
    /// - `Err(_)` - the transport failed
    async fn recv(&mut self) -> Result<Option<In>, StreamError>;

    /// Send one outbound message, waiting for buffer space.
    async fn send(&mut self, msg: Out) -> Result<(), StreamError>;
}

/// One end of an in-process duplex channel.
///
/// Receives `In`, sends `Out`. Dropping an end closes both directions for
/// the peer.
pub struct StreamEnd<In, Out> {
    inbound: mpsc::Receiver<In>,
    outbound: mpsc::Sender<Out>,
}

impl<In, Out> StreamEnd<In, Out> {
    /// Receive the next message; `None` once the peer has dropped its end.
    pub async fn next(&mut self) -> Option<In> {
        self.inbound.recv().await
    }

    /// Send a message to the peer.
    pub async fn push(&self, msg: Out) -> Result<(), StreamError> {
        self.outbound.send(msg).await.map_err(|_| StreamError::Closed)
    }

    /// Whether the peer has dropped its receiving half.
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }

    /// Stop sending while still draining inbound messages.
    pub fn into_receiver(self) -> mpsc::Receiver<In> {
        self.inbound
    }
}

#[async_trait]
impl<In, Out> MessageStream<In, Out> for StreamEnd<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    async fn recv(&mut self) -> Result<Option<In>, StreamError> {
        Ok(self.inbound.recv().await)
    }

    async fn send(&mut self, msg: Out) -> Result<(), StreamError> {
        self.push(msg).await
    }
}

/// Create a connected pair: the first end receives `A` and sends `B`, the
/// second end receives `B` and sends `A`.
pub fn duplex<A, B>(capacity: usize) -> (StreamEnd<A, B>, StreamEnd<B, A>) {
    let (a_tx, a_rx) = mpsc::channel(capacity);
    let (b_tx, b_rx) = mpsc::channel(capacity);
    debug!(capacity, "Duplex stream created");
    (
        StreamEnd {
            inbound: a_rx,
            outbound: b_tx,
        },
        StreamEnd {
            inbound: b_rx,
            outbound: a_tx,
        },
    )
}
