//! Application layer: the async driver of Deliver sessions

pub mod handler;

pub use handler::DeliverHandler;
