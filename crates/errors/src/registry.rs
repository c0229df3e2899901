//! Registry client error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RegistryError {
    #[error("registry entry not found: {name}")]
    EntryMissing { name: String },

    #[error("failed to refresh registry index from {url}: {message}")]
    RefreshFailed { url: String, message: String },

    #[error("registry cache is corrupt: {message}")]
    CacheCorrupt { message: String },

    #[error("failed to write registry cache to {path}: {message}")]
    CacheWriteFailed { path: String, message: String },
}

impl UserFacingError for RegistryError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::EntryMissing { .. } => {
                Some("Check the package name, or add an explicit git/subdirectory dependency instead.")
            }
            Self::RefreshFailed { .. } => {
                Some("Check network connectivity; a stale local cache will be used if present.")
            }
            Self::CacheCorrupt { .. } => {
                Some("Delete the registry cache file and rerun to regenerate it.")
            }
            Self::CacheWriteFailed { .. } => Some("Ensure the config directory is writable."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::RefreshFailed { .. })
    }
}
