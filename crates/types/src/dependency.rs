//! Post-resolution dependency record (§3 Dependency record).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// How a dependency was sourced, mirroring [`crate::manifest::Dependency`]
/// without the declaration-time fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencySourceKind {
    Git,
    Registry,
    Subdirectory,
    System,
    Vcpkg,
}

impl DependencySourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Registry => "registry",
            Self::Subdirectory => "subdirectory",
            Self::System => "system",
            Self::Vcpkg => "vcpkg",
        }
    }
}

/// How the dependency binds into the emitted `CMakeLists.txt`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CmakeBinding {
    pub include_dirs: Vec<String>,
    pub link_target: Option<String>,
    pub cmake_options: BTreeMap<String, String>,
    /// For registry/git deps bound via `FetchContent`.
    pub fetch_content_url: Option<String>,
    pub fetch_content_tag: Option<String>,
    /// For `subdirectory`/vendored deps.
    pub add_subdirectory_path: Option<String>,
    /// For `vcpkg` deps: resolved triplet string.
    pub vcpkg_triplet: Option<String>,
}

/// A dependency after resolution: name, source kind, resolved version,
/// materialized on-disk path, content hash, and CMake binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedDependency {
    pub name: String,
    pub source: DependencySourceKind,
    pub resolved_version: Option<String>,
    pub path: Option<PathBuf>,
    pub content_hash: Option<String>,
    pub binding: CmakeBinding,
}
