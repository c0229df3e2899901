use serde::{Deserialize, Serialize};

/// Registry Client events (component F).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegistryEvent {
    /// A registry lookup for a package name began.
    LookupStarted { name: String },

    /// The lookup was served from the local metadata cache.
    ServedFromCache { name: String, age_days: u32 },

    /// A refresh of the registry metadata cache from the index URL began.
    RefreshStarted { index_url: String },

    /// The refresh completed and the cache was rewritten.
    RefreshCompleted { index_url: String, package_count: usize },

    /// The refresh failed; a stale cache (if any) is used instead.
    RefreshFailed {
        index_url: String,
        failure: super::FailureContext,
    },

    /// The package name has no entry in the registry (fresh or cached).
    EntryMissing { name: String },
}
