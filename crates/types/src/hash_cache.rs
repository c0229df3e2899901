//! Incremental-regeneration hash cache data model (§3 Hash cache, §6
//! `cforge.hash`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps logical input names (`cforge.toml`, `cforge.workspace.toml`,
/// `<dep-name>`) to a content-hash string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashCache {
    #[serde(default, rename = "config")]
    pub config: BTreeMap<String, String>,
    #[serde(default, rename = "dependency")]
    pub dependencies: BTreeMap<String, String>,
}

impl HashCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config_hash(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn dependency_hash(&self, name: &str) -> Option<&str> {
        self.dependencies.get(name).map(String::as_str)
    }

    pub fn set_config_hash(&mut self, key: impl Into<String>, hash: impl Into<String>) {
        self.config.insert(key.into(), hash.into());
    }

    pub fn set_dependency_hash(&mut self, name: impl Into<String>, hash: impl Into<String>) {
        self.dependencies.insert(name.into(), hash.into());
    }

    /// Whether `key`'s cached hash equals `current`; `false` when absent.
    #[must_use]
    pub fn config_matches(&self, key: &str, current: &str) -> bool {
        self.config_hash(key).is_some_and(|h| h == current)
    }

    #[must_use]
    pub fn dependency_matches(&self, name: &str, current: &str) -> bool {
        self.dependency_hash(name).is_some_and(|h| h == current)
    }
}
