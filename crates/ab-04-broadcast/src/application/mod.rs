//! Application layer: the ordering loop and the per-stream handler

pub mod handler;
pub mod sequencer;

pub use handler::BroadcastHandler;
pub use sequencer::{Sequencer, SequencerHandle, Ticket};
