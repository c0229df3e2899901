//! Project and workspace manifest data model (§3).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{BuildOverlay, Compiler, Platform};

/// Output kind a project emits (§3 Project manifest: Output kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Executable,
    StaticLib,
    SharedLib,
    HeaderOnly,
}

impl OutputKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Executable => "executable",
            Self::StaticLib => "static_lib",
            Self::SharedLib => "shared_lib",
            Self::HeaderOnly => "header_only",
        }
    }
}

/// How a `git`-sourced dependency pins its ref; explicit `commit` wins over
/// `tag` wins over `branch` wins over a registry-declared version (§4.5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GitRef {
    Commit(String),
    Tag(String),
    Branch(String),
}

/// How a `system` dependency binds at CMake time (§3 Dependencies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemDependencyKind {
    FindPackage,
    PkgConfig,
    Manual,
}

/// A single declared dependency, tagged by source kind (§3, §4.5, §9 —
/// modeled as a closed tagged sum rather than a class hierarchy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Dependency {
    Git {
        name: String,
        url: String,
        #[serde(flatten)]
        git_ref: GitRefSpec,
        #[serde(default)]
        shallow: bool,
        #[serde(default = "default_true")]
        include: bool,
        #[serde(default = "default_true")]
        link: bool,
        target: Option<String>,
    },
    Registry {
        name: String,
        version: String,
    },
    Subdirectory {
        name: String,
        path: String,
        target: String,
        #[serde(default)]
        options: BTreeMap<String, String>,
    },
    System {
        name: String,
        kind: SystemDependencyKind,
        #[serde(default)]
        components: Vec<String>,
        target: Option<String>,
        #[serde(default)]
        include_dirs: Vec<String>,
        #[serde(default)]
        lib_dirs: Vec<String>,
        #[serde(default)]
        libraries: Vec<String>,
        #[serde(default)]
        defines: Vec<String>,
    },
    Vcpkg {
        name: String,
        package: String,
        triplet: Option<String>,
    },
}

/// Raw `tag`/`branch`/`commit` fields as they appear in TOML before
/// precedence resolution picks exactly one (§4.5: commit > tag > branch).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitRefSpec {
    pub commit: Option<String>,
    pub tag: Option<String>,
    pub branch: Option<String>,
}

impl GitRefSpec {
    #[must_use]
    pub fn resolve(&self) -> Option<GitRef> {
        if let Some(c) = &self.commit {
            Some(GitRef::Commit(c.clone()))
        } else if let Some(t) = &self.tag {
            Some(GitRef::Tag(t.clone()))
        } else {
            self.branch.clone().map(GitRef::Branch)
        }
    }
}

fn default_true() -> bool {
    true
}

impl Dependency {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Git { name, .. }
            | Self::Registry { name, .. }
            | Self::Subdirectory { name, .. }
            | Self::System { name, .. }
            | Self::Vcpkg { name, .. } => name,
        }
    }
}

/// A precompiled header declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecompiledHeader {
    pub header: String,
}

/// CPack-facing packaging data, modeled but treated as out-of-core
/// boilerplate by the emitter (§4.9 item 15).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackagingConfig {
    #[serde(default)]
    pub generators: Vec<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub extra_cpack_vars: BTreeMap<String, String>,
}

/// A fully loaded, immutable project manifest (§4.1: the Manifest Loader
/// returns typed records only; overlay merging happens later).
///
/// `Serialize`/`Deserialize` are hand-written rather than derived: on the
/// wire, `base` fields sit flat at the top level, `platform`/`compiler`
/// overlays are nested tables keyed by the platform/compiler name (with
/// `[platform.<p>.compiler.<c>]` for the platform×compiler overlay), and
/// build-config overlays sit under `[build.config.<cfg>]`/the deprecated
/// `[build.configs.<cfg>]` (§3, §4.3) — a shape `BTreeMap<(Platform,
/// Compiler), _>` and friends can't express directly over TOML's
/// string-keyed tables. See `WireManifest` below.
#[derive(Debug, Clone)]
pub struct ProjectManifest {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub authors: Vec<String>,
    pub license: Option<String>,

    pub output_kind: OutputKind,

    pub c_standard: Option<String>,
    pub cpp_standard: Option<String>,

    pub sources: Vec<String>,
    pub includes: Vec<String>,

    pub base: BuildOverlay,
    pub platform_overlays: BTreeMap<Platform, BuildOverlay>,
    pub compiler_overlays: BTreeMap<Compiler, BuildOverlay>,
    pub platform_compiler_overlays: BTreeMap<(Platform, Compiler), BuildOverlay>,
    pub build_config_overlays: BTreeMap<String, BuildOverlay>,
    /// Plural `[build.configs.<cfg>]` form: accepted but deprecated; the
    /// singular form above wins when both declare the same key (§4.3).
    pub build_configs_overlays_deprecated: BTreeMap<String, BuildOverlay>,

    pub dependencies: Vec<Dependency>,
    pub precompiled_headers: Vec<PrecompiledHeader>,

    pub module_paths: Vec<String>,
    pub cmake_includes: Vec<String>,
    pub inject_before_target: Option<String>,
    pub inject_after_target: Option<String>,

    pub packaging: Option<PackagingConfig>,

    /// Default `deps` (§9 Open Question: resolved in favor of `deps`, not
    /// `vendor`; see DESIGN.md).
    pub dependencies_directory: String,

    pub workspace: Option<WorkspaceManifest>,
}

fn default_dependencies_directory() -> String {
    "deps".to_string()
}

/// Nested shape of one `[platform.<p>]` table: the platform's own base
/// overlay fields flattened in, plus an optional `[platform.<p>.compiler.
/// <c>]` sub-table for the platform×compiler overlay (§3, §4.3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WirePlatformSection {
    #[serde(flatten)]
    overlay: BuildOverlay,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    compiler: BTreeMap<String, BuildOverlay>,
}

/// `[build.config.<cfg>]` / deprecated `[build.configs.<cfg>]` (§4.3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireBuildSection {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    config: BTreeMap<String, BuildOverlay>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    configs: BTreeMap<String, BuildOverlay>,
}

/// On-disk shape of a project manifest (§3). `base` overlay fields are
/// flattened to the top level alongside the project metadata fields;
/// `platform`/`compiler`/`build` are the only nested overlay tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireManifest {
    name: String,
    version: String,
    description: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    license: Option<String>,

    output_kind: OutputKind,

    c_standard: Option<String>,
    cpp_standard: Option<String>,

    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    includes: Vec<String>,

    #[serde(flatten)]
    base: BuildOverlay,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    platform: BTreeMap<String, WirePlatformSection>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    compiler: BTreeMap<String, BuildOverlay>,
    #[serde(default)]
    build: WireBuildSection,

    #[serde(default)]
    dependencies: Vec<Dependency>,
    #[serde(default)]
    precompiled_headers: Vec<PrecompiledHeader>,

    #[serde(default)]
    module_paths: Vec<String>,
    #[serde(default)]
    cmake_includes: Vec<String>,
    inject_before_target: Option<String>,
    inject_after_target: Option<String>,

    packaging: Option<PackagingConfig>,

    #[serde(default = "default_dependencies_directory")]
    dependencies_directory: String,

    workspace: Option<WorkspaceManifest>,
}

impl From<WireManifest> for ProjectManifest {
    fn from(wire: WireManifest) -> Self {
        let mut platform_overlays = BTreeMap::new();
        let mut platform_compiler_overlays = BTreeMap::new();
        for (platform_name, section) in wire.platform {
            let platform = Platform::parse(&platform_name);
            platform_overlays.insert(platform, section.overlay);
            for (compiler_name, overlay) in section.compiler {
                platform_compiler_overlays
                    .insert((platform, Compiler::parse(&compiler_name)), overlay);
            }
        }
        let compiler_overlays = wire
            .compiler
            .into_iter()
            .map(|(name, overlay)| (Compiler::parse(&name), overlay))
            .collect();

        Self {
            name: wire.name,
            version: wire.version,
            description: wire.description,
            authors: wire.authors,
            license: wire.license,
            output_kind: wire.output_kind,
            c_standard: wire.c_standard,
            cpp_standard: wire.cpp_standard,
            sources: wire.sources,
            includes: wire.includes,
            base: wire.base,
            platform_overlays,
            compiler_overlays,
            platform_compiler_overlays,
            build_config_overlays: wire.build.config,
            build_configs_overlays_deprecated: wire.build.configs,
            dependencies: wire.dependencies,
            precompiled_headers: wire.precompiled_headers,
            module_paths: wire.module_paths,
            cmake_includes: wire.cmake_includes,
            inject_before_target: wire.inject_before_target,
            inject_after_target: wire.inject_after_target,
            packaging: wire.packaging,
            dependencies_directory: wire.dependencies_directory,
            workspace: wire.workspace,
        }
    }
}

impl From<&ProjectManifest> for WireManifest {
    fn from(manifest: &ProjectManifest) -> Self {
        let mut platform: BTreeMap<String, WirePlatformSection> = manifest
            .platform_overlays
            .iter()
            .map(|(platform, overlay)| {
                (
                    platform.as_str().to_string(),
                    WirePlatformSection {
                        overlay: overlay.clone(),
                        compiler: BTreeMap::new(),
                    },
                )
            })
            .collect();
        for ((pc_platform, pc_compiler), overlay) in &manifest.platform_compiler_overlays {
            platform
                .entry(pc_platform.as_str().to_string())
                .or_default()
                .compiler
                .insert(pc_compiler.as_str().to_string(), overlay.clone());
        }

        Self {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            description: manifest.description.clone(),
            authors: manifest.authors.clone(),
            license: manifest.license.clone(),
            output_kind: manifest.output_kind,
            c_standard: manifest.c_standard.clone(),
            cpp_standard: manifest.cpp_standard.clone(),
            sources: manifest.sources.clone(),
            includes: manifest.includes.clone(),
            base: manifest.base.clone(),
            platform,
            compiler: manifest
                .compiler_overlays
                .iter()
                .map(|(compiler, overlay)| (compiler.as_str().to_string(), overlay.clone()))
                .collect(),
            build: WireBuildSection {
                config: manifest.build_config_overlays.clone(),
                configs: manifest.build_configs_overlays_deprecated.clone(),
            },
            dependencies: manifest.dependencies.clone(),
            precompiled_headers: manifest.precompiled_headers.clone(),
            module_paths: manifest.module_paths.clone(),
            cmake_includes: manifest.cmake_includes.clone(),
            inject_before_target: manifest.inject_before_target.clone(),
            inject_after_target: manifest.inject_after_target.clone(),
            packaging: manifest.packaging.clone(),
            dependencies_directory: manifest.dependencies_directory.clone(),
            workspace: manifest.workspace.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for ProjectManifest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        WireManifest::deserialize(deserializer).map(Self::from)
    }
}

impl Serialize for ProjectManifest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        WireManifest::from(self).serialize(serializer)
    }
}

impl ProjectManifest {
    #[must_use]
    pub fn languages(&self) -> Vec<&'static str> {
        let mut langs = Vec::new();
        if self.c_standard.is_some() {
            langs.push("C");
        }
        if self.cpp_standard.is_some() {
            langs.push("CXX");
        }
        langs
    }
}

/// One equivalent form of a workspace member declaration (§3 Workspace
/// manifest: array of paths | inline project tables | legacy colon string).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceMember {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub startup: bool,
    /// Inline overrides declared directly in the workspace manifest's
    /// member table, before the member's own `cforge.toml` is consulted.
    /// Per §3, the member's own file wins on conflict and a warning names
    /// both sources.
    #[serde(default)]
    pub inline_overrides: BTreeMap<String, toml::Value>,
    /// Inter-project dependency names declared for this member.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// A workspace manifest (present via `[workspace]` in `cforge.toml`, or the
/// legacy standalone `cforge.workspace.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceManifest {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<WorkspaceMember>,
    pub default_startup: Option<String>,
    #[serde(default)]
    pub shared_build: Option<BuildOverlay>,
}

impl WorkspaceManifest {
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&WorkspaceMember> {
        self.members.iter().find(|m| m.name == name)
    }

    #[must_use]
    pub fn startup_member(&self) -> Option<&WorkspaceMember> {
        self.members
            .iter()
            .find(|m| m.startup)
            .or_else(|| {
                self.default_startup
                    .as_deref()
                    .and_then(|n| self.member(n))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
name = "app"
version = "0.1.0"
output_kind = "executable"
cpp_standard = "20"
defines = ["BASE"]

[platform.linux]
defines = ["LINUX"]

[platform.linux.compiler.gcc]
defines = ["LINUX_GCC"]

[compiler.clang]
defines = ["CLANG"]

[build.config.Debug]
defines = ["DEBUG"]

[build.configs.Release]
defines = ["RELEASE_LEGACY"]
"#;

    #[test]
    fn parses_nested_platform_compiler_and_build_overlays() {
        let manifest: ProjectManifest = toml::from_str(FULL).unwrap();
        assert_eq!(manifest.base.defines, vec!["BASE"]);
        assert_eq!(
            manifest.platform_overlays[&Platform::Linux].defines,
            vec!["LINUX"]
        );
        assert_eq!(
            manifest.platform_compiler_overlays[&(Platform::Linux, Compiler::Gcc)].defines,
            vec!["LINUX_GCC"]
        );
        assert_eq!(manifest.compiler_overlays[&Compiler::Clang].defines, vec!["CLANG"]);
        assert_eq!(manifest.build_config_overlays["Debug"].defines, vec!["DEBUG"]);
        assert_eq!(
            manifest.build_configs_overlays_deprecated["Release"].defines,
            vec!["RELEASE_LEGACY"]
        );
    }

    #[test]
    fn round_trips_through_toml_serialize_then_deserialize() {
        let original: ProjectManifest = toml::from_str(FULL).unwrap();
        let rendered = toml::to_string_pretty(&original).unwrap();
        let reparsed: ProjectManifest = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed.base.defines, original.base.defines);
        assert_eq!(
            reparsed.platform_compiler_overlays[&(Platform::Linux, Compiler::Gcc)].defines,
            vec!["LINUX_GCC"]
        );
        assert_eq!(
            reparsed.build_configs_overlays_deprecated["Release"].defines,
            vec!["RELEASE_LEGACY"]
        );
    }
}
