//! # Configuration (AB-02)
//!
//! Validates chain configuration updates and applies them atomically.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): configuration set, chain parameters, errors
//! - **Ports Layer** (`ports/`): `ConfigurationApi`
//! - **Application Layer** (`application/`): `ConfigurationManager`
//!
//! ## Lifecycle
//!
//! ```text
//! genesis envelope (sequence 0) --from_genesis--> active
//! update (sequence n+1) --validate--> proposal --commit--> active
//! ```
//!
//! `validate` never changes state. `commit` is issued by the ordering loop
//! after the block carrying the update is in the log; a proposal that no
//! longer extends the active sequence is refused.

pub mod application;
pub mod domain;
pub mod ports;

// Re-export public API
pub use application::{ActiveConfiguration, ConfigurationManager, ProposedConfiguration};
pub use domain::{
    decode_batch_size, decode_batch_timeout, encode_batch_size, encode_batch_timeout,
    ChainParameters, ConfigError, ConfigItem, ConfigKey, ConfigurationSet, BATCH_SIZE_KEY,
    BATCH_TIMEOUT_KEY,
};
pub use ports::ConfigurationApi;
