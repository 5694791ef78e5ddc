//! Configuration for policy evaluation

use crate::domain::entities::SignatureReuse;
use crate::domain::validation::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};

/// Policy evaluation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Whether one signature may satisfy several leaves
    pub signature_reuse: SignatureReuse,
    /// Maximum nesting depth of a policy tree
    pub max_depth: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            signature_reuse: SignatureReuse::Shared,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
