//! TOML-shaped persistence for the hash cache (`cforge.hash`, §6).

use cforge_errors::{Error, HashError};
use cforge_types::HashCache;
use std::path::Path;

/// Load a hash cache from `path`.
///
/// # Errors
/// Returns [`HashError::CacheReadFailed`] if the file cannot be read, or
/// [`HashError::CacheCorrupt`] if it cannot be parsed as TOML.
pub async fn load_cache(path: &Path) -> Result<HashCache, Error> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| HashError::CacheReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    toml::from_str(&contents)
        .map_err(|e| {
            HashError::CacheCorrupt {
                path: path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        })
}

/// Persist a hash cache to `path`.
///
/// # Errors
/// Returns [`HashError::CacheWriteFailed`] if the file cannot be written.
pub async fn store_cache(path: &Path, cache: &HashCache) -> Result<(), Error> {
    let rendered = toml::to_string_pretty(cache).map_err(|e| HashError::CacheWriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tokio::fs::write(path, rendered)
        .await
        .map_err(|e| HashError::CacheWriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cforge.hash");
        let mut cache = HashCache::new();
        cache.set_config_hash("cforge.toml", "abc123");
        cache.set_dependency_hash("fmt", "def456");

        store_cache(&path, &cache).await.unwrap();
        let loaded = load_cache(&path).await.unwrap();
        assert!(loaded.config_matches("cforge.toml", "abc123"));
        assert!(loaded.dependency_matches("fmt", "def456"));
    }

    #[tokio::test]
    async fn missing_file_is_an_error_callers_treat_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.hash");
        assert!(load_cache(&path).await.is_err());
        let fallback = super::super::load_or_default(&path).await;
        assert!(fallback.config.is_empty());
    }
}
