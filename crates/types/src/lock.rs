//! Lock file data model (§3 Lock file entry, §6 `cforge.lock`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `[metadata]` block of `cforge.lock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    pub schema_version: u32,
    pub generated_at: String,
}

impl LockMetadata {
    pub const CURRENT_SCHEMA_VERSION: u32 = 1;
}

/// One `[dependency.<name>]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockEntry {
    pub source: String,
    pub url: String,
    pub version: String,
    pub resolved: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// The full contents of `cforge.lock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockFile {
    pub metadata: LockMetadata,
    #[serde(default, rename = "dependency")]
    pub dependencies: BTreeMap<String, LockEntry>,
}

impl LockFile {
    #[must_use]
    pub fn new(generated_at: impl Into<String>) -> Self {
        Self {
            metadata: LockMetadata {
                schema_version: LockMetadata::CURRENT_SCHEMA_VERSION,
                generated_at: generated_at.into(),
            },
            dependencies: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LockEntry> {
        self.dependencies.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: LockEntry) {
        self.dependencies.insert(name.into(), entry);
    }
}
