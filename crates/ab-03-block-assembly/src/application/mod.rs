//! Application layer: the ledger writer and its read handles

pub mod ledger;

pub use ledger::{ChainLedger, LedgerReader};
