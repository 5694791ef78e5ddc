//! # Deliver Stream Handler
//!
//! Drives one [`DeliverSession`] over a client stream. Each turn it sends
//! every block the window allows that is already committed, then waits for
//! whichever comes first: a client update or a ledger commit.
//!
//! A session suspends exactly when its window is exhausted or the next block
//! does not exist yet. Errors are reported once as `DeliverResponse::Error`
//! and end the session.

use crate::config::DeliverConfig;
use crate::domain::errors::DeliverError;
use crate::domain::session::{AckOutcome, DeliverSession};
use crate::ports::outbound::ChainDirectory;
use ab_03_block_assembly::LedgerReader;
use shared_bus::{MessageStream, StreamError};
use shared_types::{DeliverResponse, DeliverUpdate, SeekInfo};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Deliver handler shared by all sessions of a node.
#[derive(Clone)]
pub struct DeliverHandler {
    directory: Arc<dyn ChainDirectory>,
    config: DeliverConfig,
}

/// What a session is reading from.
struct Source {
    reader: LedgerReader,
    /// `None` once the chain's writer is gone; no new blocks will come
    commits: Option<watch::Receiver<u64>>,
}

impl DeliverHandler {
    pub fn new(directory: Arc<dyn ChainDirectory>, config: DeliverConfig) -> Self {
        Self { directory, config }
    }

    /// Serve `stream` until the client finishes or the session fails.
    ///
    /// Session errors are answered on the stream and return `Ok`; `Err`
    /// means the stream itself broke.
    pub async fn handle<S>(&self, stream: &mut S) -> Result<(), StreamError>
    where
        S: MessageStream<DeliverUpdate, DeliverResponse>,
    {
        let mut session = DeliverSession::new(self.config.max_window_size);
        let mut source: Option<Source> = None;
        let mut delivered = 0u64;

        loop {
            if let Some(src) = &source {
                while let Some(number) = session.next_due() {
                    let Some(block) = src.reader.get(number) else {
                        break;
                    };
                    stream.send(DeliverResponse::Block((*block).clone())).await?;
                    session.mark_sent();
                    delivered += 1;
                }
            }

            tokio::select! {
                update = stream.recv() => {
                    let Some(update) = update? else {
                        session.close();
                        break;
                    };
                    let result = match update {
                        DeliverUpdate::Seek(seek) => self.seek(&mut session, &seek).map(|src| {
                            source = Some(src);
                        }),
                        DeliverUpdate::Acknowledgement(ack) => {
                            session.acknowledge(ack.number).map(|outcome| {
                                if outcome == AckOutcome::Ignored {
                                    debug!(number = ack.number, "Acknowledgement ignored");
                                }
                            })
                        }
                    };
                    if let Err(e) = result {
                        warn!(status = %e.status(), error = %e, "Deliver session failed");
                        session.close();
                        stream.send(DeliverResponse::Error(e.status())).await?;
                        break;
                    }
                }
                changed = next_commit(&mut source) => {
                    if changed.is_err() {
                        if let Some(src) = source.as_mut() {
                            debug!(chain_id = %src.reader.chain_id(), "Chain writer closed");
                            src.commits = None;
                        }
                    }
                }
            }
        }

        info!(delivered, "Deliver stream closed");
        Ok(())
    }

    fn seek(&self, session: &mut DeliverSession, seek: &SeekInfo) -> Result<Source, DeliverError> {
        let reader = self
            .directory
            .reader(&seek.chain_id)
            .ok_or_else(|| DeliverError::UnknownChain(seek.chain_id.to_string()))?;
        let window = session.seek(seek, reader.newest())?;
        debug!(
            chain_id = %seek.chain_id,
            start = ?seek.start,
            cursor = window.cursor,
            window_size = window.window_size,
            "Deliver seek"
        );
        let commits = Some(reader.subscribe());
        Ok(Source { reader, commits })
    }
}

/// Resolves on the next commit to the session's chain; never resolves
/// without one.
async fn next_commit(source: &mut Option<Source>) -> Result<(), watch::error::RecvError> {
    match source.as_mut().and_then(|src| src.commits.as_mut()) {
        Some(commits) => commits.changed().await,
        None => std::future::pending().await,
    }
}
