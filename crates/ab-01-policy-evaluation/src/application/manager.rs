//! Named policy table
//!
//! Configuration items refer to policies by name (`ModificationPolicy`).
//! The table is rebuilt from the `Policy`-typed items of a configuration set
//! and replaced as a whole when a new configuration commits.

use super::evaluator::PolicyEvaluator;
use crate::domain::errors::PolicyError;
use shared_types::{Configuration, ConfigurationType, Policy};
use std::collections::BTreeMap;
use tracing::debug;

/// Policy name -> validated policy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyManager {
    policies: BTreeMap<String, Policy>,
}

impl PolicyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from configuration items, ignoring non-policy types.
    pub fn from_configurations<'a, I>(
        items: I,
        evaluator: &PolicyEvaluator,
    ) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = &'a Configuration>,
    {
        let mut manager = Self::new();
        for item in items {
            if item.kind != ConfigurationType::Policy {
                continue;
            }
            let policy = evaluator.parse_policy(&item.data)?;
            manager.insert(item.id.clone(), policy);
        }
        debug!(policies = manager.len(), "Policy table built");
        Ok(manager)
    }

    pub fn insert(&mut self, name: impl Into<String>, policy: Policy) {
        self.policies.insert(name.into(), policy);
    }

    /// Look up a policy by name.
    pub fn get(&self, name: &str) -> Result<&Policy, PolicyError> {
        self.policies
            .get(name)
            .ok_or_else(|| PolicyError::UnknownPolicy(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
