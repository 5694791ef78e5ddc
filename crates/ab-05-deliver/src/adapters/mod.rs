//! Adapters for the Deliver ports

pub mod directory;

pub use directory::ReaderDirectory;
