//! # Configuration Manager
//!
//! Validates `ConfigurationEnvelope` updates against the active
//! configuration and swaps the active configuration when the anchoring block
//! commits.
//!
//! ## Validation Order
//!
//! 1. Envelope targets this chain and `Sequence == current + 1`
//! 2. Every entry decodes, names this chain, has an ID and a policy name,
//!    and is unique by (Type, ID)
//! 3. Entries with `LastModified < Sequence` are byte-identical to the
//!    active entry; entries with `LastModified == Sequence` are well-formed
//!    for their type
//! 4. At least one entry anchors `Sequence`; no active entry is missing
//! 5. Each changed entry is authorized by the policy its previous version
//!    names (a new entry: the policy it names itself)
//!
//! Steps 1-4 reject with `BAD_REQUEST`, step 5 with `FORBIDDEN`.

use crate::domain::entities::{ConfigItem, ConfigKey, ConfigurationSet};
use crate::domain::errors::ConfigError;
use crate::domain::parameters::{
    decode_batch_size, decode_batch_timeout, ChainParameters, BATCH_SIZE_KEY, BATCH_TIMEOUT_KEY,
};
use crate::ports::inbound::ConfigurationApi;
use ab_01_policy_evaluation::{PolicyEvaluationApi, PolicyEvaluator, PolicyManager};
use parking_lot::RwLock;
use shared_types::codec;
use shared_types::{
    ChainId, Configuration, ConfigurationEntry, ConfigurationEnvelope, ConfigurationType,
    SignedData, MAX_MESSAGE_BYTES,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable snapshot of a chain's configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveConfiguration {
    pub sequence: u64,
    pub set: ConfigurationSet,
    pub policies: PolicyManager,
    pub parameters: ChainParameters,
}

/// A validated update waiting for its block to commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposedConfiguration {
    next: ActiveConfiguration,
    changed: Vec<ConfigKey>,
}

impl ProposedConfiguration {
    pub fn sequence(&self) -> u64 {
        self.next.sequence
    }

    /// Parameters that become active with this proposal.
    pub fn parameters(&self) -> ChainParameters {
        self.next.parameters
    }

    /// Keys of the entries this update modifies or adds.
    pub fn changed(&self) -> &[ConfigKey] {
        &self.changed
    }
}

/// Configuration manager for one chain.
pub struct ConfigurationManager {
    chain_id: ChainId,
    evaluator: PolicyEvaluator,
    active: RwLock<Arc<ActiveConfiguration>>,
    history: RwLock<Vec<u64>>,
}

impl ConfigurationManager {
    /// Bootstrap from the sequence-0 envelope carried by the genesis block.
    ///
    /// The envelope is checked structurally only; there is no prior policy
    /// set to authorize it against.
    pub fn from_genesis(
        chain_id: ChainId,
        envelope: &ConfigurationEnvelope,
        evaluator: PolicyEvaluator,
    ) -> Result<Self, ConfigError> {
        check_chain(&chain_id, envelope)?;
        if envelope.sequence != 0 {
            return Err(ConfigError::SequenceMismatch {
                expected: 0,
                got: envelope.sequence,
            });
        }

        let decoded = decode_entries(envelope)?;
        let mut set = ConfigurationSet::new();
        for (item, _) in decoded {
            if item.configuration.last_modified != 0 {
                return Err(ConfigError::FutureModification {
                    kind: item.configuration.kind,
                    id: item.configuration.id.clone(),
                    last_modified: item.configuration.last_modified,
                    sequence: 0,
                });
            }
            check_well_formed(&item.configuration, &evaluator)?;
            set.insert(item);
        }

        let policies = PolicyManager::from_configurations(set.configurations(), &evaluator)?;
        let parameters = ChainParameters::from_set(&set);
        info!(
            chain_id = %chain_id,
            entries = set.len(),
            policies = policies.len(),
            "Genesis configuration loaded"
        );

        Ok(Self {
            chain_id,
            evaluator,
            active: RwLock::new(Arc::new(ActiveConfiguration {
                sequence: 0,
                set,
                policies,
                parameters,
            })),
            history: RwLock::new(vec![0]),
        })
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    /// Every sequence committed so far, genesis first.
    pub fn committed_sequences(&self) -> Vec<u64> {
        self.history.read().clone()
    }

    /// Batch parameters of the active configuration.
    pub fn parameters(&self) -> ChainParameters {
        self.active.read().parameters
    }

    fn authorize(
        &self,
        current: &ActiveConfiguration,
        envelope: &ConfigurationEnvelope,
        signatures: &[SignedData],
        changed: &[(&ConfigItem, &ConfigurationEntry)],
    ) -> Result<(), ConfigError> {
        let envelope_bytes = envelope.to_bytes()?;
        let envelope_signers = self
            .evaluator
            .verify_signed_data(signatures, &envelope_bytes);

        for (item, entry) in changed {
            let config = &item.configuration;
            let policy_name = current
                .set
                .get(config.kind, &config.id)
                .map(|prior| prior.configuration.modification_policy.as_str())
                .unwrap_or(config.modification_policy.as_str());
            let policy = current.policies.get(policy_name)?;

            let mut signers = envelope_signers.clone();
            signers.extend(
                self.evaluator
                    .verify_signed_data(&entry.signatures, &entry.configuration),
            );

            if !self.evaluator.evaluate(policy, &signers)? {
                warn!(
                    chain_id = %self.chain_id,
                    kind = %config.kind,
                    id = %config.id,
                    policy = policy_name,
                    signers = signers.len(),
                    "Configuration change not authorized"
                );
                return Err(ConfigError::Unauthorized {
                    kind: config.kind,
                    id: config.id.clone(),
                    policy: policy_name.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl ConfigurationApi for ConfigurationManager {
    fn validate(
        &self,
        envelope: &ConfigurationEnvelope,
        signatures: &[SignedData],
    ) -> Result<ProposedConfiguration, ConfigError> {
        let current = self.current();
        check_chain(&self.chain_id, envelope)?;

        let sequence = current.sequence + 1;
        if envelope.sequence != sequence {
            return Err(ConfigError::SequenceMismatch {
                expected: sequence,
                got: envelope.sequence,
            });
        }

        let decoded = decode_entries(envelope)?;
        let mut changed = Vec::new();
        for (item, entry) in &decoded {
            let config = &item.configuration;
            if config.last_modified > sequence {
                return Err(ConfigError::FutureModification {
                    kind: config.kind,
                    id: config.id.clone(),
                    last_modified: config.last_modified,
                    sequence,
                });
            }

            if config.last_modified < sequence {
                let unchanged = current
                    .set
                    .get(config.kind, &config.id)
                    .is_some_and(|prior| prior.encoded == item.encoded);
                if !unchanged {
                    return Err(ConfigError::UnchangedEntryDiffers {
                        kind: config.kind,
                        id: config.id.clone(),
                    });
                }
            } else {
                check_well_formed(config, &self.evaluator)?;
                changed.push((item, *entry));
            }
        }

        if changed.is_empty() {
            return Err(ConfigError::MissingAnchor { sequence });
        }

        let proposed_keys: BTreeSet<ConfigKey> =
            decoded.iter().map(|(item, _)| item.key()).collect();
        if let Some((kind, id)) = current.set.keys().find(|key| !proposed_keys.contains(*key)) {
            return Err(ConfigError::MissingEntry {
                kind: *kind,
                id: id.clone(),
            });
        }

        self.authorize(&current, envelope, signatures, &changed)?;

        let changed_keys: Vec<ConfigKey> = changed.iter().map(|(item, _)| item.key()).collect();
        let mut set = ConfigurationSet::new();
        for (item, _) in decoded {
            set.insert(item);
        }
        let policies = PolicyManager::from_configurations(set.configurations(), &self.evaluator)?;
        let parameters = ChainParameters::from_set(&set);

        debug!(
            chain_id = %self.chain_id,
            sequence,
            changed = changed_keys.len(),
            "Configuration update validated"
        );

        Ok(ProposedConfiguration {
            next: ActiveConfiguration {
                sequence,
                set,
                policies,
                parameters,
            },
            changed: changed_keys,
        })
    }

    fn commit(&self, proposal: ProposedConfiguration) -> Result<(), ConfigError> {
        let mut active = self.active.write();
        let mut history = self.history.write();

        if proposal.sequence() != active.sequence + 1 {
            return Err(ConfigError::StaleProposal {
                active: active.sequence,
                proposed: proposal.sequence(),
            });
        }

        let sequence = proposal.sequence();
        *active = Arc::new(proposal.next);
        history.push(sequence);

        info!(
            chain_id = %self.chain_id,
            sequence,
            changed = proposal.changed.len(),
            "Configuration committed"
        );
        Ok(())
    }

    fn current(&self) -> Arc<ActiveConfiguration> {
        self.active.read().clone()
    }
}

fn check_chain(chain_id: &ChainId, envelope: &ConfigurationEnvelope) -> Result<(), ConfigError> {
    if &envelope.chain_id != chain_id {
        return Err(ConfigError::WrongChain {
            expected: chain_id.to_string(),
            got: envelope.chain_id.to_string(),
        });
    }
    Ok(())
}

/// Decode entries and apply the checks common to every entry.
fn decode_entries(
    envelope: &ConfigurationEnvelope,
) -> Result<Vec<(ConfigItem, &ConfigurationEntry)>, ConfigError> {
    if envelope.entries.is_empty() {
        return Err(ConfigError::Empty);
    }

    let mut seen = BTreeSet::new();
    let mut decoded = Vec::with_capacity(envelope.entries.len());
    for (index, entry) in envelope.entries.iter().enumerate() {
        let configuration: Configuration = codec::decode(&entry.configuration, MAX_MESSAGE_BYTES)
            .map_err(|e| ConfigError::MalformedEntry {
                index,
                reason: e.to_string(),
            })?;

        if configuration.chain_id != envelope.chain_id {
            return Err(ConfigError::EntryChainMismatch {
                kind: configuration.kind,
                id: configuration.id,
                got: configuration.chain_id.to_string(),
            });
        }
        if configuration.id.is_empty() {
            return Err(ConfigError::EmptyField { index, field: "ID" });
        }
        if configuration.modification_policy.is_empty() {
            return Err(ConfigError::EmptyField {
                index,
                field: "ModificationPolicy",
            });
        }

        let item = ConfigItem {
            configuration,
            encoded: entry.configuration.clone(),
        };
        if !seen.insert(item.key()) {
            return Err(ConfigError::DuplicateEntry {
                kind: item.configuration.kind,
                id: item.configuration.id,
            });
        }
        decoded.push((item, entry));
    }
    Ok(decoded)
}

/// Per-type data checks for a new or modified entry.
fn check_well_formed(config: &Configuration, evaluator: &PolicyEvaluator) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidData {
        kind: config.kind,
        id: config.id.clone(),
        reason,
    };

    match config.kind {
        ConfigurationType::Policy => evaluator
            .parse_policy(&config.data)
            .map(|_| ())
            .map_err(|e| invalid(e.to_string())),
        ConfigurationType::Chain => match config.id.as_str() {
            BATCH_SIZE_KEY => decode_batch_size(&config.data).map(|_| ()).map_err(invalid),
            BATCH_TIMEOUT_KEY => decode_batch_timeout(&config.data).map(|_| ()).map_err(invalid),
            _ => Ok(()),
        },
        ConfigurationType::Fabric
        | ConfigurationType::Solo
        | ConfigurationType::Kafka
        | ConfigurationType::Pbft => Ok(()),
    }
}
