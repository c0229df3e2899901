//! CMake emitter error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum EmitterError {
    #[error("failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("no effective configuration available for build config {build_config}")]
    MissingConfig { build_config: String },

    #[error("dependency {name} has no resolved CMake target")]
    MissingCmakeTarget { name: String },

    #[error("project declares no languages (need at least one of c_standard/cpp_standard)")]
    NoLanguages,
}

impl UserFacingError for EmitterError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::WriteFailed { .. } => Some("Ensure the project directory is writable."),
            Self::MissingConfig { .. } => {
                Some("Resolve the effective configuration for this build config before emitting.")
            }
            Self::MissingCmakeTarget { .. } => {
                Some("Resolve the dependency before emitting CMakeLists.txt.")
            }
            Self::NoLanguages => {
                Some("Declare `c_standard` and/or `cpp_standard` in the manifest.")
            }
        }
    }
}
