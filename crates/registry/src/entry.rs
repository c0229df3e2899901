//! Registry metadata shapes (component F: Registry Client).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One known version of a registry package: a semver string paired with the
/// git tag that carries it (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryVersionEntry {
    pub version: String,
    pub git_tag: String,
}

/// CMake integration metadata a registry entry ships so the Dependency
/// Resolver and CMake Emitter don't have to guess a package's target name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CmakeIntegration {
    pub target_name: Option<String>,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// Subdirectory within the cloned repository whose `CMakeLists.txt`
    /// should be added, for packages not rooted at the repository top.
    pub cmake_subdir: Option<String>,
}

/// Per-platform setup commands run once after materialization when expected
/// output files are missing (§4.5 registry source-kind behavior).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupCommands {
    #[serde(default)]
    pub linux: Vec<String>,
    #[serde(default)]
    pub macos: Vec<String>,
    #[serde(default)]
    pub windows: Vec<String>,
}

/// One package's full registry record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    pub repository_url: String,
    #[serde(default)]
    pub versions: Vec<RegistryVersionEntry>,
    /// Tag template with a `{version}` token, used when versions are derived
    /// (e.g. `v{version}`) rather than individually enumerated.
    pub tag_pattern: Option<String>,
    #[serde(default)]
    pub cmake: CmakeIntegration,
    #[serde(default)]
    pub setup: SetupCommands,
}

impl RegistryEntry {
    /// Render the git tag for a resolved version, preferring an explicit
    /// enumerated entry and falling back to `tag_pattern` substitution.
    #[must_use]
    pub fn tag_for_version(&self, version: &str) -> Option<String> {
        if let Some(entry) = self.versions.iter().find(|v| v.version == version) {
            return Some(entry.git_tag.clone());
        }
        self.tag_pattern
            .as_ref()
            .map(|pattern| pattern.replace("{version}", version))
    }
}
