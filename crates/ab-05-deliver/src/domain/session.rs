//! # Deliver Session State Machine
//!
//! ```text
//!                 Seek                   Seek (reconfigure)
//! AwaitingSeek ─────────→ Streaming ←──────────────┐
//!      │                      │  └─────────────────┘
//!      │ error / end          │ error / end
//!      └──────────→ Closed ←──┘
//! ```
//!
//! Pure and synchronous: the session decides which block number is due
//! next, the driver fetches and sends it. The window invariant
//! `cursor - window_base <= window_size` holds after every transition.

use super::errors::DeliverError;
use shared_types::{SeekInfo, SeekPosition};

/// Streaming position of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Next block number to send
    pub cursor: u64,
    /// Lowest unacknowledged block number
    pub window_base: u64,
    /// Blocks that may be outstanding past `window_base`
    pub window_size: u64,
}

impl Window {
    /// Whether the block at `cursor` may be sent now.
    pub fn is_open(&self) -> bool {
        self.cursor - self.window_base < self.window_size
    }

    /// Blocks sent but not yet acknowledged.
    pub fn outstanding(&self) -> u64 {
        self.cursor - self.window_base
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingSeek,
    Streaming(Window),
    Closed,
}

/// Outcome of an acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// Window moved; blocks up to `window_base + window_size - 1` may flow
    Advanced { window_base: u64 },
    /// Stale, or for a block not sent yet
    Ignored,
}

/// One client's Deliver session.
#[derive(Debug, Clone)]
pub struct DeliverSession {
    state: SessionState,
    max_window_size: u64,
}

impl DeliverSession {
    pub fn new(max_window_size: u64) -> Self {
        Self {
            state: SessionState::AwaitingSeek,
            max_window_size: max_window_size.max(1),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn window(&self) -> Option<Window> {
        match self.state {
            SessionState::Streaming(window) => Some(window),
            _ => None,
        }
    }

    /// Apply a seek. `newest` is the chain's newest block number at this
    /// moment. Discards any previous window.
    pub fn seek(&mut self, seek: &SeekInfo, newest: Option<u64>) -> Result<Window, DeliverError> {
        if self.state == SessionState::Closed {
            return Err(DeliverError::Closed);
        }
        if seek.window_size == 0 {
            return Err(DeliverError::ZeroWindow);
        }

        let cursor = match seek.start {
            SeekPosition::Newest => newest.unwrap_or(0),
            SeekPosition::Oldest => 0,
            SeekPosition::Specified => seek.specified_number,
        };
        let window = Window {
            cursor,
            window_base: cursor,
            window_size: seek.window_size.min(self.max_window_size),
        };
        self.state = SessionState::Streaming(window);
        Ok(window)
    }

    /// Apply an acknowledgement of block `number`.
    pub fn acknowledge(&mut self, number: u64) -> Result<AckOutcome, DeliverError> {
        let window = match &mut self.state {
            SessionState::Streaming(window) => window,
            SessionState::AwaitingSeek => return Err(DeliverError::AckBeforeSeek),
            SessionState::Closed => return Err(DeliverError::Closed),
        };
        if number < window.window_base || number >= window.cursor {
            return Ok(AckOutcome::Ignored);
        }
        window.window_base = number + 1;
        Ok(AckOutcome::Advanced {
            window_base: window.window_base,
        })
    }

    /// Block number to send next, if the window allows one.
    pub fn next_due(&self) -> Option<u64> {
        match self.state {
            SessionState::Streaming(window) if window.is_open() => Some(window.cursor),
            _ => None,
        }
    }

    /// Record that the block returned by [`next_due`](Self::next_due) was sent.
    pub fn mark_sent(&mut self) {
        if let SessionState::Streaming(window) = &mut self.state {
            if window.is_open() {
                window.cursor += 1;
            }
        }
    }

    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }
}
