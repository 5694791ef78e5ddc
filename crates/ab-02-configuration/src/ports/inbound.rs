//! Inbound Ports (Driving Ports / API)

use crate::application::manager::{ActiveConfiguration, ProposedConfiguration};
use crate::domain::errors::ConfigError;
use shared_types::{ConfigurationEnvelope, SignedData};
use std::sync::Arc;

/// Primary Configuration API, driven by the ordering loop.
pub trait ConfigurationApi: Send + Sync {
    /// Validate and authorize an update against the active configuration.
    ///
    /// Has no side effects; the returned proposal is applied by `commit`.
    fn validate(
        &self,
        envelope: &ConfigurationEnvelope,
        signatures: &[SignedData],
    ) -> Result<ProposedConfiguration, ConfigError>;

    /// Make a validated proposal the active configuration. Called once the
    /// block anchoring it is committed.
    fn commit(&self, proposal: ProposedConfiguration) -> Result<(), ConfigError>;

    /// Snapshot of the active configuration.
    fn current(&self) -> Arc<ActiveConfiguration>;

    /// Active sequence number.
    fn sequence(&self) -> u64 {
        self.current().sequence
    }
}
