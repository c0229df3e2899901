#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core data model for the cforge build orchestrator.
//!
//! This crate defines the project/workspace manifest shape, the effective
//! configuration produced by overlay resolution, the resolved-dependency
//! record, the lock file, and the incremental hash cache — the types every
//! other `cforge-*` crate builds on.

pub mod config;
pub mod dependency;
pub mod hash_cache;
pub mod lock;
pub mod manifest;
pub mod version;

pub use config::{
    BuildOverlay, Compiler, EffectiveConfig, Hardening, OptimizeLevel, Platform, PortableOptions,
    Sanitizer, StdLib, Visibility, WarningLevel,
};
pub use dependency::{CmakeBinding, DependencySourceKind, ResolvedDependency};
pub use hash_cache::HashCache;
pub use lock::{LockEntry, LockFile, LockMetadata};
pub use manifest::{
    Dependency, GitRef, GitRefSpec, OutputKind, PackagingConfig, PrecompiledHeader,
    ProjectManifest, SystemDependencyKind, WorkspaceManifest, WorkspaceMember,
};
pub use version::{Version, VersionConstraint};

use serde::{Deserialize, Serialize};

/// Output format for CLI commands (human TTY, plain text, or JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Tty,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Tty
    }
}

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}
