//! Domain entities for policy evaluation

use serde::{Deserialize, Serialize};

/// How signatures may be spent across the leaves of one policy tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureReuse {
    /// Every leaf sees the full signer set; one signature may satisfy any
    /// number of `SignedBy` leaves.
    #[default]
    #[serde(rename = "shared")]
    Shared,

    /// A signature satisfies at most one leaf. `NOutOf` children are
    /// evaluated left to right and a satisfied child's consumption is kept;
    /// the assignment is greedy, not a best matching.
    #[serde(rename = "exclusive")]
    Exclusive,
}

impl SignatureReuse {
    /// Parse a config string.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "shared" => Some(Self::Shared),
            "exclusive" => Some(Self::Exclusive),
            _ => None,
        }
    }
}

/// Identities whose signatures verified over the payload being authorized.
///
/// Deduplicated: the same signer signing twice counts once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignerSet {
    identities: Vec<Vec<u8>>,
}

impl SignerSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from identities authenticated elsewhere.
    pub fn from_identities<I>(identities: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut set = Self::new();
        for identity in identities {
            set.insert(identity);
        }
        set
    }

    /// Add an identity; returns false if it was already present.
    pub fn insert(&mut self, identity: Vec<u8>) -> bool {
        if self.contains(&identity) {
            return false;
        }
        self.identities.push(identity);
        true
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: SignerSet) {
        for identity in other.identities {
            self.insert(identity);
        }
    }

    pub fn contains(&self, identity: &[u8]) -> bool {
        self.identities.iter().any(|i| i == identity)
    }

    /// Identities in insertion order.
    pub fn identities(&self) -> &[Vec<u8>] {
        &self.identities
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
