//! Registry Client (component F): look up package metadata by name against
//! a locally cached index, refreshing from the configured URL when stale.

use crate::cache::RegistryCache;
use crate::entry::RegistryEntry;
use crate::transport::IndexTransport;
use async_trait::async_trait;
use cforge_errors::{Error, RegistryError};
use cforge_events::{EventEmitter, EventSender};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Object-safe lookup surface so downstream crates (the Dependency
/// Resolver) can depend on `&dyn RegistryLookup` instead of the transport
/// type parameter.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<RegistryEntry, Error>;
}

/// The raw index document shape served at `index_url`: a flat map of package
/// name to its registry record.
#[derive(Debug, Clone, serde::Deserialize)]
struct IndexDocument {
    #[serde(default)]
    packages: BTreeMap<String, RegistryEntry>,
}

pub struct RegistryClient<T: IndexTransport> {
    transport: T,
    index_url: String,
    cache_path: PathBuf,
    max_age_days: u32,
    events: Option<EventSender>,
}

impl<T: IndexTransport> RegistryClient<T> {
    #[must_use]
    pub fn new(transport: T, index_url: impl Into<String>, cache_path: PathBuf, max_age_days: u32) -> Self {
        Self {
            transport,
            index_url: index_url.into(),
            cache_path,
            max_age_days,
            events: None,
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Look up `name`, refreshing the cache first if it's stale or absent.
    /// A stale cache is preferred over a hard failure when refresh fails but
    /// an entry is already present (§4.6).
    ///
    /// # Errors
    /// Returns [`RegistryError::EntryMissing`] if no cache and no successful
    /// refresh ever produced a record for `name`.
    pub async fn lookup(&self, name: &str) -> Result<RegistryEntry, Error> {
        let mut cache = RegistryCache::load(&self.cache_path).await;

        if cache.is_stale(self.max_age_days) {
            if let Some(e) = &self.events {
                e.emit(cforge_events::AppEvent::Registry(
                    cforge_events::RegistryEvent::RefreshStarted {
                        index_url: self.index_url.clone(),
                    },
                ));
            }
            match self.refresh().await {
                Ok(refreshed) => {
                    if let Some(e) = &self.events {
                        e.emit(cforge_events::AppEvent::Registry(
                            cforge_events::RegistryEvent::RefreshCompleted {
                                index_url: self.index_url.clone(),
                                package_count: refreshed.packages.len(),
                            },
                        ));
                    }
                    refreshed.save(&self.cache_path).await?;
                    cache = refreshed;
                }
                Err(err) => {
                    if let Some(e) = &self.events {
                        let failure = cforge_events::FailureContext::from(&err);
                        e.emit(cforge_events::AppEvent::Registry(
                            cforge_events::RegistryEvent::RefreshFailed {
                                index_url: self.index_url.clone(),
                                failure,
                            },
                        ));
                    }
                    if cache.packages.is_empty() {
                        return Err(err);
                    }
                    tracing::warn!(
                        "registry refresh failed, using stale cache: {err}"
                    );
                }
            }
        }

        cache.packages.get(name).cloned().ok_or_else(|| {
            if let Some(e) = &self.events {
                e.emit(cforge_events::AppEvent::Registry(
                    cforge_events::RegistryEvent::EntryMissing {
                        name: name.to_string(),
                    },
                ));
            }
            RegistryError::EntryMissing {
                name: name.to_string(),
            }
            .into()
        })
    }

    async fn refresh(&self) -> Result<RegistryCache, Error> {
        let raw = self.transport.fetch(&self.index_url).await?;
        let doc: IndexDocument = serde_json::from_str(&raw).map_err(|e| RegistryError::RefreshFailed {
            url: self.index_url.clone(),
            message: e.to_string(),
        })?;
        Ok(RegistryCache {
            fetched_at: Some(chrono::Utc::now().to_rfc3339()),
            packages: doc.packages,
        })
    }
}

#[async_trait]
impl<T: IndexTransport> RegistryLookup for RegistryClient<T> {
    async fn lookup(&self, name: &str) -> Result<RegistryEntry, Error> {
        RegistryClient::lookup(self, name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{CmakeIntegration, RegistryVersionEntry, SetupCommands};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeTransport {
        body: String,
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl IndexTransport for FakeTransport {
        async fn fetch(&self, _url: &str) -> Result<String, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RegistryError::RefreshFailed {
                    url: "fake".to_string(),
                    message: "connection refused".to_string(),
                }
                .into());
            }
            Ok(self.body.clone())
        }
    }

    fn sample_index_json() -> String {
        serde_json::json!({
            "packages": {
                "fmt": {
                    "name": "fmt",
                    "repository_url": "https://github.com/fmtlib/fmt",
                    "versions": [{"version": "10.2.1", "git_tag": "10.2.1"}],
                    "tag_pattern": null,
                    "cmake": {"target_name": "fmt::fmt", "options": {}, "cmake_subdir": null},
                    "setup": {"linux": [], "macos": [], "windows": []}
                }
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn lookup_refreshes_cold_cache_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("registry-cache.toml");
        let transport = FakeTransport {
            body: sample_index_json(),
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let client = RegistryClient::new(transport, "https://index.example/v1", cache_path.clone(), 1);

        let entry = client.lookup("fmt").await.unwrap();
        assert_eq!(entry.repository_url, "https://github.com/fmtlib/fmt");
        assert!(cache_path.exists());
    }

    #[tokio::test]
    async fn lookup_missing_package_errors() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("registry-cache.toml");
        let transport = FakeTransport {
            body: sample_index_json(),
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let client = RegistryClient::new(transport, "https://index.example/v1", cache_path, 1);

        let err = client.lookup("does-not-exist").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::EntryMissing { .. })
        ));
    }

    #[tokio::test]
    async fn stale_refresh_failure_falls_back_to_cached_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("registry-cache.toml");
        let mut packages = BTreeMap::new();
        packages.insert(
            "fmt".to_string(),
            RegistryEntry {
                name: "fmt".to_string(),
                repository_url: "https://github.com/fmtlib/fmt".to_string(),
                versions: vec![RegistryVersionEntry {
                    version: "10.2.0".to_string(),
                    git_tag: "10.2.0".to_string(),
                }],
                tag_pattern: None,
                cmake: CmakeIntegration::default(),
                setup: SetupCommands::default(),
            },
        );
        let stale = RegistryCache {
            fetched_at: Some((chrono::Utc::now() - chrono::Duration::days(30)).to_rfc3339()),
            packages,
        };
        stale.save(&cache_path).await.unwrap();

        let transport = FakeTransport {
            body: String::new(),
            calls: AtomicUsize::new(0),
            fail: true,
        };
        let client = RegistryClient::new(transport, "https://index.example/v1", cache_path, 1);

        let entry = client.lookup("fmt").await.unwrap();
        assert_eq!(entry.versions[0].version, "10.2.0");
    }
}
