//! On-disk registry cache: a TOML file under the tool's config directory,
//! refreshed from the configured index URL when stale (§4.6).

use crate::entry::RegistryEntry;
use cforge_errors::{Error, RegistryError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegistryCache {
    /// RFC 3339 timestamp of the last successful refresh.
    pub fetched_at: Option<String>,
    #[serde(default, rename = "package")]
    pub packages: BTreeMap<String, RegistryEntry>,
}

impl RegistryCache {
    /// Load the cache from `path`, treating a missing or corrupt file as an
    /// empty cache rather than a hard error (mirrors the hash cache's
    /// corruption-is-absent rule).
    pub async fn load(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Persist the cache via write-to-temp-then-rename so a concurrent
    /// reader never observes a partially written file.
    ///
    /// # Errors
    /// Returns [`RegistryError::CacheWriteFailed`] if the temp file cannot
    /// be written or renamed into place.
    pub async fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RegistryError::CacheWriteFailed {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
        }
        let rendered = toml::to_string_pretty(self).map_err(|e| RegistryError::CacheWriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let tmp_path = path.with_extension("toml.tmp");
        tokio::fs::write(&tmp_path, rendered)
            .await
            .map_err(|e| RegistryError::CacheWriteFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|e| RegistryError::CacheWriteFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    #[must_use]
    pub fn is_stale(&self, max_age_days: u32) -> bool {
        let Some(fetched_at) = &self.fetched_at else {
            return true;
        };
        let Ok(fetched_at) = chrono::DateTime::parse_from_rfc3339(fetched_at) else {
            return true;
        };
        let age = chrono::Utc::now().signed_duration_since(fetched_at);
        age > chrono::Duration::days(i64::from(max_age_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::RegistryVersionEntry;

    #[tokio::test]
    async fn missing_file_loads_as_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RegistryCache::load(&dir.path().join("registry-cache.toml")).await;
        assert!(cache.packages.is_empty());
        assert!(cache.is_stale(1));
    }

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry-cache.toml");
        let mut cache = RegistryCache {
            fetched_at: Some(chrono::Utc::now().to_rfc3339()),
            packages: BTreeMap::new(),
        };
        cache.packages.insert(
            "fmt".to_string(),
            RegistryEntry {
                name: "fmt".to_string(),
                repository_url: "https://github.com/fmtlib/fmt".to_string(),
                versions: vec![RegistryVersionEntry {
                    version: "10.2.1".to_string(),
                    git_tag: "10.2.1".to_string(),
                }],
                tag_pattern: None,
                cmake: Default::default(),
                setup: Default::default(),
            },
        );
        cache.save(&path).await.unwrap();

        let loaded = RegistryCache::load(&path).await;
        assert_eq!(loaded.packages.len(), 1);
        assert!(!loaded.is_stale(7));
    }

    #[test]
    fn corrupt_timestamp_counts_as_stale() {
        let cache = RegistryCache {
            fetched_at: Some("not-a-timestamp".to_string()),
            packages: BTreeMap::new(),
        };
        assert!(cache.is_stale(30));
    }
}
