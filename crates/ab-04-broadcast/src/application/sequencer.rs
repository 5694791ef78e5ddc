//! # Ordering Loop
//!
//! The single point where a chain's total order is decided.
//!
//! ```text
//! producer tasks --SequencerHandle::submit--> mpsc (bounded) --> Sequencer::run
//!                                                                  |
//!                                   BlockCutter -> ChainLedger::append_batch
//!                                                                  |
//!                                     oneshot(Status) <------------+
//! ```
//!
//! ## Rules
//!
//! - One task owns the ledger writer and the admission counter
//! - A message is answered only after the block holding it commits
//! - A configuration update is validated here, against the configuration in
//!   force at its position, then ordered alone in its own block; the new
//!   configuration becomes active right after that block commits
//! - A rejected update consumes no position
//! - A fatal assembly error halts the chain: everything pending or queued is
//!   answered `SERVICE_UNAVAILABLE` and no further message is accepted

use crate::config::BroadcastConfig;
use crate::domain::errors::BroadcastError;
use crate::domain::validation::validate_message;
use crate::ports::inbound::BroadcastApi;
use ab_02_configuration::{ChainParameters, ConfigurationApi, ProposedConfiguration};
use ab_03_block_assembly::{AssemblyConfig, Batch, BlockCutter, ChainLedger, PendingMessage};
use shared_types::{BroadcastMessage, ChainId, Status, Transaction};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

/// A validated message on its way to the ordering loop.
#[derive(Debug)]
pub struct OrderRequest {
    transaction: Transaction,
    data: Vec<u8>,
    respond: oneshot::Sender<Status>,
}

/// Per-message state kept while the message waits in the cutter.
#[derive(Debug)]
struct Slot {
    respond: oneshot::Sender<Status>,
    position: u64,
    proposal: Option<ProposedConfiguration>,
}

/// The eventual status of a submitted message.
#[derive(Debug)]
pub enum Ticket {
    /// Decided at submission (rejected, or not enqueued)
    Ready(Status),
    /// Enqueued; resolved by the ordering loop
    Pending(oneshot::Receiver<Status>),
}

impl Ticket {
    /// Wait for the outcome.
    ///
    /// A ticket whose request was dropped without an answer (the ordering
    /// loop went away) resolves to `SERVICE_UNAVAILABLE`.
    pub async fn status(self) -> Status {
        match self {
            Self::Ready(status) => status,
            Self::Pending(rx) => rx.await.unwrap_or(Status::ServiceUnavailable),
        }
    }
}

/// Submission side of a chain's ordering loop. Cheap to clone; one per
/// producer stream.
#[derive(Clone)]
pub struct SequencerHandle {
    chain_id: ChainId,
    tx: mpsc::Sender<OrderRequest>,
    halted: Arc<AtomicBool>,
    admitted: Arc<AtomicU64>,
    max_message_bytes: u64,
}

impl SequencerHandle {
    /// Whether the chain stopped after a fatal error.
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    /// Positions assigned so far.
    pub fn admitted(&self) -> u64 {
        self.admitted.load(Ordering::Acquire)
    }

    fn enqueue(&self, message: &BroadcastMessage) -> Result<Ticket, BroadcastError> {
        if self.is_halted() {
            return Err(BroadcastError::Halted);
        }
        let transaction = validate_message(message, &self.chain_id, self.max_message_bytes)?;

        let (respond, rx) = oneshot::channel();
        let request = OrderRequest {
            transaction,
            data: message.data.clone(),
            respond,
        };
        match self.tx.try_send(request) {
            Ok(()) => Ok(Ticket::Pending(rx)),
            Err(TrySendError::Full(_)) => Err(BroadcastError::QueueFull),
            Err(TrySendError::Closed(_)) => Err(BroadcastError::Halted),
        }
    }
}

impl BroadcastApi for SequencerHandle {
    fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    fn submit(&self, message: &BroadcastMessage) -> Ticket {
        match self.enqueue(message) {
            Ok(ticket) => ticket,
            Err(e) => {
                let status = e.status();
                if status.is_retryable() {
                    warn!(chain_id = %self.chain_id, error = %e, "Message not enqueued");
                } else {
                    debug!(chain_id = %self.chain_id, error = %e, "Message rejected");
                }
                Ticket::Ready(status)
            }
        }
    }
}

/// The ordering loop of one chain.
pub struct Sequencer {
    chain_id: ChainId,
    ledger: ChainLedger,
    configuration: Arc<dyn ConfigurationApi>,
    cutter: BlockCutter<Slot>,
    defaults: AssemblyConfig,
    batch_timeout: Duration,
    next_position: u64,
    rx: mpsc::Receiver<OrderRequest>,
    halted: Arc<AtomicBool>,
    admitted: Arc<AtomicU64>,
}

impl Sequencer {
    /// Create the loop and its submission handle. The ledger must already
    /// hold the genesis block.
    pub fn new(
        ledger: ChainLedger,
        configuration: Arc<dyn ConfigurationApi>,
        assembly: &AssemblyConfig,
        broadcast: &BroadcastConfig,
    ) -> (Self, SequencerHandle) {
        let chain_id = ledger.chain_id().clone();
        let (tx, rx) = mpsc::channel(broadcast.queue_capacity.max(1));
        let halted = Arc::new(AtomicBool::new(false));
        let admitted = Arc::new(AtomicU64::new(0));

        let mut sequencer = Self {
            chain_id: chain_id.clone(),
            ledger,
            configuration,
            cutter: BlockCutter::new(assembly.batch_size, assembly.max_batch_bytes),
            defaults: assembly.clone(),
            batch_timeout: assembly.batch_timeout(),
            next_position: 0,
            rx,
            halted: Arc::clone(&halted),
            admitted: Arc::clone(&admitted),
        };
        let parameters = sequencer.configuration.current().parameters;
        sequencer.apply_parameters(parameters);

        let handle = SequencerHandle {
            chain_id,
            tx,
            halted,
            admitted,
            max_message_bytes: broadcast.max_message_bytes,
        };
        (sequencer, handle)
    }

    /// Run until every handle is dropped or the chain halts.
    pub async fn run(mut self) {
        info!(
            chain_id = %self.chain_id,
            height = self.ledger.height(),
            batch_size = self.cutter.batch_size(),
            batch_timeout_ms = self.batch_timeout.as_millis() as u64,
            "Ordering loop started"
        );

        let mut deadline: Option<Instant> = None;
        loop {
            let timer = async move {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                request = self.rx.recv() => {
                    let Some(request) = request else { break };
                    match self.on_request(request) {
                        Ok(opened_batch) => deadline = self.next_deadline(deadline, opened_batch),
                        Err(e) => {
                            self.halt(e);
                            return;
                        }
                    }
                }
                () = timer => {
                    deadline = None;
                    if let Some(batch) = self.cutter.cut() {
                        debug!(chain_id = %self.chain_id, messages = batch.len(), "Batch timeout");
                        if let Err(e) = self.commit(batch) {
                            self.halt(e);
                            return;
                        }
                    }
                }
            }
        }

        // Every handle is gone; flush what was admitted
        if let Some(batch) = self.cutter.cut() {
            if let Err(e) = self.commit(batch) {
                self.halt(e);
                return;
            }
        }
        info!(chain_id = %self.chain_id, admitted = self.next_position, "Ordering loop stopped");
    }

    /// The batch timer runs from the first message of the pending batch.
    fn next_deadline(&self, current: Option<Instant>, opened_batch: bool) -> Option<Instant> {
        if self.cutter.is_empty() {
            None
        } else if opened_batch {
            Some(Instant::now() + self.batch_timeout)
        } else {
            current.or_else(|| Some(Instant::now() + self.batch_timeout))
        }
    }

    /// Admit one request. `Ok(true)` when it opened a new pending batch;
    /// `Err` is fatal for the chain.
    fn on_request(&mut self, request: OrderRequest) -> Result<bool, BroadcastError> {
        let OrderRequest {
            transaction,
            data,
            respond,
        } = request;

        let proposal = match transaction.as_configuration() {
            Some(envelope) => match self
                .configuration
                .validate(envelope, &transaction.signatures)
            {
                Ok(proposal) => Some(proposal),
                Err(e) => {
                    warn!(
                        chain_id = %self.chain_id,
                        sequence = envelope.sequence,
                        status = %e.status(),
                        error = %e,
                        "Configuration update rejected"
                    );
                    let _ = respond.send(e.status());
                    return Ok(false);
                }
            },
            None => None,
        };

        let position = self.next_position;
        self.next_position += 1;
        self.admitted.store(self.next_position, Ordering::Release);

        let isolated = proposal.is_some();
        debug!(chain_id = %self.chain_id, position, isolated, "Message admitted");

        let message = PendingMessage {
            data,
            ticket: Slot {
                respond,
                position,
                proposal,
            },
        };
        let ordered = self.cutter.ordered(message, isolated);
        self.commit_all(ordered.batches)?;
        Ok(ordered.opened_batch)
    }

    fn commit_all(&mut self, batches: Vec<Batch<Slot>>) -> Result<(), BroadcastError> {
        let mut batches = batches.into_iter();
        while let Some(batch) = batches.next() {
            if let Err(e) = self.commit(batch) {
                for rest in batches {
                    reply_all(rest.into_iter().map(|m| m.ticket), Status::ServiceUnavailable);
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Append one block, apply a configuration it carries, then answer.
    fn commit(&mut self, batch: Batch<Slot>) -> Result<(), BroadcastError> {
        let (data, slots): (Vec<Vec<u8>>, Vec<Slot>) =
            batch.into_iter().map(|m| (m.data, m.ticket)).unzip();

        let block = match self.ledger.append_batch(data) {
            Ok(block) => block,
            Err(e) => {
                self.halted.store(true, Ordering::Release);
                reply_all(slots, Status::ServiceUnavailable);
                return Err(e.into());
            }
        };

        let mut slots = slots.into_iter();
        while let Some(slot) = slots.next() {
            if let Some(proposal) = slot.proposal {
                let sequence = proposal.sequence();
                let parameters = proposal.parameters();
                if let Err(e) = self.configuration.commit(proposal) {
                    self.halted.store(true, Ordering::Release);
                    let _ = slot.respond.send(Status::ServiceUnavailable);
                    reply_all(slots, Status::ServiceUnavailable);
                    return Err(e.into());
                }
                self.apply_parameters(parameters);
                info!(
                    chain_id = %self.chain_id,
                    sequence,
                    number = block.number(),
                    "Configuration update ordered"
                );
            }
            debug!(
                chain_id = %self.chain_id,
                position = slot.position,
                number = block.number(),
                "Message committed"
            );
            // The producer may have gone away; the message is committed regardless
            let _ = slot.respond.send(Status::Success);
        }
        Ok(())
    }

    fn apply_parameters(&mut self, parameters: ChainParameters) {
        let batch_size = parameters.batch_size.unwrap_or(self.defaults.batch_size);
        let batch_timeout = parameters
            .batch_timeout
            .unwrap_or_else(|| self.defaults.batch_timeout());
        self.cutter.set_batch_size(batch_size);
        self.batch_timeout = batch_timeout;
        debug!(
            chain_id = %self.chain_id,
            batch_size,
            batch_timeout_ms = batch_timeout.as_millis() as u64,
            "Batch parameters applied"
        );
    }

    fn halt(&mut self, error: BroadcastError) {
        self.halted.store(true, Ordering::Release);
        error!(
            chain_id = %self.chain_id,
            height = self.ledger.height(),
            error = %error,
            "Fatal ordering error, chain halted"
        );

        let pending = self.cutter.drain();
        reply_all(pending.into_iter().map(|m| m.ticket), Status::ServiceUnavailable);

        self.rx.close();
        let mut dropped = 0usize;
        while let Ok(request) = self.rx.try_recv() {
            let _ = request.respond.send(Status::ServiceUnavailable);
            dropped += 1;
        }
        if dropped > 0 {
            warn!(chain_id = %self.chain_id, dropped, "Queued messages discarded");
        }
    }
}

fn reply_all(slots: impl IntoIterator<Item = Slot>, status: Status) {
    for slot in slots {
        let _ = slot.respond.send(status);
    }
}
