//! Overlay resolution and portable-flags translation error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("invalid config: {message}")]
    Invalid { message: String },

    #[error("failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("failed to write config to {path}: {error}")]
    WriteError { path: String, error: String },

    #[error("overlay {overlay} conflicts with an earlier value for {field}")]
    OverlayConflict { overlay: String, field: String },

    #[error("unknown platform override: {value}")]
    UnknownPlatform { value: String },

    #[error("unknown compiler override: {value}")]
    UnknownCompiler { value: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some(
                "Provide a configuration file or run `cforge init` to create a default one.",
            ),
            Self::Invalid { .. } | Self::ParseError { .. } | Self::InvalidValue { .. } => {
                Some("Fix the configuration value named in the error and retry.")
            }
            Self::WriteError { .. } => Some("Ensure the config path is writable and retry."),
            Self::OverlayConflict { .. } => {
                Some("Remove the conflicting scalar override from one of the overlapping overlays.")
            }
            Self::UnknownPlatform { .. } | Self::UnknownCompiler { .. } => {
                Some("Use one of the recognized platform/compiler names, or omit the override to auto-detect.")
            }
        }
    }
}
