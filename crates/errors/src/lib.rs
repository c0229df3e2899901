#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the cforge build orchestrator
//!
//! This crate provides fine-grained error types organized by domain
//! (manifest, config, version, registry, resolver, emitter, workspace,
//! analyzer, driver, runner, hash). All error types implement `Clone` so
//! they can be threaded through the event system as well as returned.

pub mod analyzer;
pub mod config;
pub mod driver;
pub mod emitter;
pub mod hash;
pub mod manifest;
pub mod registry;
pub mod resolver;
pub mod runner;
pub mod version;
pub mod workspace;

pub use analyzer::AnalyzerError;
pub use config::ConfigError;
pub use driver::DriverError;
pub use emitter::EmitterError;
pub use hash::HashError;
pub use manifest::ManifestError;
pub use registry::RegistryError;
pub use resolver::ResolverError;
pub use runner::RunnerError;
pub use version::VersionError;
pub use workspace::WorkspaceError;

use std::borrow::Cow;
use thiserror::Error;

/// Trait implemented by every domain error so the CLI can render a
/// consistent message/hint pair regardless of which component failed.
pub trait UserFacingError {
    /// Message shown to the user (defaults to the `Display` rendering).
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional actionable suggestion shown below the error.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether simply rerunning the same command might succeed.
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Generic error type for cross-crate boundaries.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("version error: {0}")]
    Version(#[from] VersionError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("dependency resolution error: {0}")]
    Resolver(#[from] ResolverError),

    #[error("emitter error: {0}")]
    Emitter(#[from] EmitterError),

    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("include analysis error: {0}")]
    Analyzer(#[from] AnalyzerError),

    #[error("build driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("test/benchmark runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("content hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("I/O error: {message}")]
    Io {
        #[cfg_attr(feature = "serde", serde(with = "io_kind_as_str"))]
        kind: std::io::ErrorKind,
        message: String,
        #[cfg_attr(feature = "serde", serde(with = "opt_path_buf"))]
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an internal error with a message.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an I/O error carrying the path that was being operated on.
    #[must_use]
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

/// Result type alias for cforge operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "serde")]
mod io_kind_as_str {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(kind: &std::io::ErrorKind, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&format!("{kind:?}"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<std::io::ErrorKind, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "NotFound" => std::io::ErrorKind::NotFound,
            "PermissionDenied" => std::io::ErrorKind::PermissionDenied,
            "AlreadyExists" => std::io::ErrorKind::AlreadyExists,
            "InvalidInput" => std::io::ErrorKind::InvalidInput,
            "InvalidData" => std::io::ErrorKind::InvalidData,
            "TimedOut" => std::io::ErrorKind::TimedOut,
            "Interrupted" => std::io::ErrorKind::Interrupted,
            "UnexpectedEof" => std::io::ErrorKind::UnexpectedEof,
            _ => std::io::ErrorKind::Other,
        })
    }
}

#[cfg(feature = "serde")]
mod opt_path_buf {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(path: &Option<std::path::PathBuf>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match path {
            Some(pb) => s.serialize_some(&pb.display().to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<std::path::PathBuf>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<String>::deserialize(deserializer)?;
        Ok(opt.map(std::path::PathBuf::from))
    }
}
