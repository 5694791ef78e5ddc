//! Domain entities for chain configuration

use shared_types::{Configuration, ConfigurationType};
use std::collections::BTreeMap;

/// Key of a configuration item within one chain.
pub type ConfigKey = (ConfigurationType, String);

/// A decoded configuration item together with the exact bytes it was
/// committed as. Unchanged entries in later updates are compared against
/// these bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigItem {
    pub configuration: Configuration,
    pub encoded: Vec<u8>,
}

impl ConfigItem {
    pub fn key(&self) -> ConfigKey {
        (self.configuration.kind, self.configuration.id.clone())
    }
}

/// The full set of configuration items of a chain, ordered by (Type, ID).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigurationSet {
    items: BTreeMap<ConfigKey, ConfigItem>,
}

impl ConfigurationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, returning the one it replaced.
    pub fn insert(&mut self, item: ConfigItem) -> Option<ConfigItem> {
        self.items.insert(item.key(), item)
    }

    pub fn get(&self, kind: ConfigurationType, id: &str) -> Option<&ConfigItem> {
        self.items.get(&(kind, id.to_string()))
    }

    pub fn contains(&self, key: &ConfigKey) -> bool {
        self.items.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ConfigKey> {
        self.items.keys()
    }

    pub fn items(&self) -> impl Iterator<Item = &ConfigItem> {
        self.items.values()
    }

    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.items.values().map(|item| &item.configuration)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
