//! Content hashing and hash-cache error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum HashError {
    #[error("failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("failed to read cache {path}: {message}")]
    CacheReadFailed { path: String, message: String },

    #[error("failed to write cache {path}: {message}")]
    CacheWriteFailed { path: String, message: String },

    #[error("hash cache at {path} is corrupt and will be regenerated: {message}")]
    CacheCorrupt { path: String, message: String },
}

impl UserFacingError for HashError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ReadFailed { .. } => Some("Check that the input path exists and is readable."),
            Self::CacheReadFailed { .. } | Self::CacheCorrupt { .. } => {
                Some("The hash cache will be regenerated on the next run; this is not fatal.")
            }
            Self::CacheWriteFailed { .. } => Some("Ensure the project directory is writable."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CacheReadFailed { .. } | Self::CacheCorrupt { .. }
        )
    }
}
