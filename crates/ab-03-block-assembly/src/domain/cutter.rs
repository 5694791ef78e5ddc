//! Block cutter
//!
//! Groups ordered messages into batches. A batch is cut when it reaches the
//! message count limit, when its payload reaches the byte limit, when the
//! batch timer fires (`cut`), or when an isolated message (a configuration
//! transaction) arrives, which always gets a batch of its own.
//!
//! The cutter never reorders: concatenating its batches yields the input
//! sequence.

/// A message waiting to be batched, with the caller's per-message `ticket`.
#[derive(Debug)]
pub struct PendingMessage<T> {
    pub data: Vec<u8>,
    pub ticket: T,
}

/// A cut batch in admission order.
pub type Batch<T> = Vec<PendingMessage<T>>;

/// What adding one message did to the cutter.
#[derive(Debug)]
pub struct Ordered<T> {
    /// Batches completed by the message, in order
    pub batches: Vec<Batch<T>>,
    /// The message opened a new pending batch; its timer starts now
    pub opened_batch: bool,
}

/// Accumulates messages until a cut condition holds.
#[derive(Debug)]
pub struct BlockCutter<T> {
    pending: Vec<PendingMessage<T>>,
    pending_bytes: usize,
    batch_size: usize,
    max_batch_bytes: usize,
}

impl<T> BlockCutter<T> {
    pub fn new(batch_size: u32, max_batch_bytes: usize) -> Self {
        Self {
            pending: Vec::new(),
            pending_bytes: 0,
            batch_size: (batch_size as usize).max(1),
            max_batch_bytes: max_batch_bytes.max(1),
        }
    }

    /// New batch size; applies from the next message on.
    pub fn set_batch_size(&mut self, batch_size: u32) {
        self.batch_size = (batch_size as usize).max(1);
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Add one message. Completes none, one, or two batches (the flushed
    /// pending batch followed by the message's own batch).
    ///
    /// A byte-limit flush leaves the message pending on its own; that is
    /// reported as `opened_batch` like a message into an empty cutter.
    pub fn ordered(&mut self, message: PendingMessage<T>, isolated: bool) -> Ordered<T> {
        let mut batches = Vec::new();
        let size = message.data.len();

        if isolated {
            batches.extend(self.cut());
            batches.push(vec![message]);
            return Ordered {
                batches,
                opened_batch: false,
            };
        }

        if !self.pending.is_empty() && self.pending_bytes + size > self.max_batch_bytes {
            batches.extend(self.cut());
        }

        let opening = self.pending.is_empty();
        self.pending_bytes += size;
        self.pending.push(message);

        if self.pending.len() >= self.batch_size || self.pending_bytes >= self.max_batch_bytes {
            batches.extend(self.cut());
        }
        Ordered {
            batches,
            opened_batch: opening && !self.pending.is_empty(),
        }
    }

    /// Flush whatever is pending (batch timer expiry).
    pub fn cut(&mut self) -> Option<Batch<T>> {
        if self.pending.is_empty() {
            return None;
        }
        self.pending_bytes = 0;
        Some(std::mem::take(&mut self.pending))
    }

    /// Drop all pending messages, handing them back to the caller.
    pub fn drain(&mut self) -> Batch<T> {
        self.pending_bytes = 0;
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
