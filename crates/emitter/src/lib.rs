#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform/compiler probe, configuration resolver, portable-flags
//! translator, and CMake emitter (components B, C, D, I).
//!
//! [`emit`] is the single entry point the Build Driver and Workspace
//! Orchestrator call: it hash-gates rendering against the project's
//! `cforge.hash` cache (§4.9, §7 "Hash cache corruption is treated as
//! absent") so an unchanged manifest and dependency set never rewrites
//! `CMakeLists.txt`, keeping downstream incremental builds untouched.

pub mod config_resolver;
pub mod probe;
pub mod translate;
pub mod writer;

use cforge_errors::{EmitterError, Error};
use cforge_events::{EmitEvent, EventEmitter};
use cforge_types::{ProjectManifest, ResolvedDependency, WorkspaceMember};
use std::path::Path;

/// Outcome of one [`emit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    /// The content hash of manifest + dependencies matched the cache;
    /// `CMakeLists.txt` was left untouched.
    SkippedUpToDate,
    /// `CMakeLists.txt` was (re)written.
    Written { bytes: usize },
}

/// Render and write `CMakeLists.txt` into `project_dir`, gated by the
/// content hash of `manifest` + `resolved` against `cforge.hash` in the
/// same directory.
///
/// # Errors
/// Returns [`EmitterError::NoLanguages`] or
/// [`EmitterError::MissingCmakeTarget`] if `writer::render` rejects the
/// input, or an I/O error if the hash cache or `CMakeLists.txt` cannot be
/// written.
pub async fn emit(
    project_dir: &Path,
    manifest: &ProjectManifest,
    resolved: &[ResolvedDependency],
    build_configs: &[String],
    workspace_deps: &[&WorkspaceMember],
    events: &impl EventEmitter,
) -> Result<EmitOutcome, Error> {
    let project = manifest.name.clone();
    let cmake_path = project_dir.join("CMakeLists.txt");
    let hash_path = project_dir.join(cforge_config::constants::DEFAULT_HASH_CACHE_FILE_NAME);

    events.emit(cforge_events::AppEvent::Emit(EmitEvent::Started {
        project: project.clone(),
        path: cmake_path.display().to_string(),
    }));

    let content_hash = content_hash_of(manifest, resolved);
    let mut cache = cforge_hash::load_or_default(&hash_path).await;
    if cache.config_matches("cforge.toml", &content_hash) && cmake_path.exists() {
        events.emit(cforge_events::AppEvent::Emit(EmitEvent::SkippedUpToDate {
            project,
            path: cmake_path.display().to_string(),
        }));
        return Ok(EmitOutcome::SkippedUpToDate);
    }

    let rendered = match writer::render(manifest, resolved, build_configs, workspace_deps) {
        Ok(text) => text,
        Err(error) => {
            events.emit(cforge_events::AppEvent::Emit(EmitEvent::Failed {
                project: project.clone(),
                failure: cforge_events::FailureContext::from(&error),
            }));
            return Err(error);
        }
    };

    tokio::fs::write(&cmake_path, &rendered)
        .await
        .map_err(|e| EmitterError::WriteFailed {
            path: cmake_path.display().to_string(),
            message: e.to_string(),
        })?;

    cache.set_config_hash("cforge.toml", &content_hash);
    cforge_hash::save(&hash_path, &cache).await?;

    events.emit(cforge_events::AppEvent::Emit(EmitEvent::Written {
        project,
        path: cmake_path.display().to_string(),
        bytes: rendered.len(),
    }));

    Ok(EmitOutcome::Written { bytes: rendered.len() })
}

/// Fold the manifest's TOML and each resolved dependency's content hash
/// (if any) into one rolling hash key, so either changing.
fn content_hash_of(manifest: &ProjectManifest, resolved: &[ResolvedDependency]) -> String {
    let manifest_toml = toml::to_string(manifest).unwrap_or_default();
    let mut hasher = cforge_hash::Fnv1a::new();
    hasher.update(manifest_toml.as_bytes());
    for dep in resolved {
        hasher.update(dep.name.as_bytes());
        if let Some(hash) = &dep.content_hash {
            hasher.update(hash.as_bytes());
        }
    }
    hasher.finish_hex()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cforge_events::EventSender;
    use cforge_types::{BuildOverlay, OutputKind};
    use std::collections::BTreeMap;

    fn minimal_manifest() -> ProjectManifest {
        ProjectManifest {
            name: "demo".to_string(),
            version: "1.0.0".to_string(),
            description: None,
            authors: Vec::new(),
            license: None,
            output_kind: OutputKind::Executable,
            c_standard: None,
            cpp_standard: Some("20".to_string()),
            sources: vec!["src/main.cpp".to_string()],
            includes: Vec::new(),
            base: BuildOverlay::default(),
            platform_overlays: BTreeMap::new(),
            compiler_overlays: BTreeMap::new(),
            platform_compiler_overlays: BTreeMap::new(),
            build_config_overlays: BTreeMap::new(),
            build_configs_overlays_deprecated: BTreeMap::new(),
            dependencies: Vec::new(),
            precompiled_headers: Vec::new(),
            module_paths: Vec::new(),
            cmake_includes: Vec::new(),
            inject_before_target: None,
            inject_after_target: None,
            packaging: None,
            dependencies_directory: "deps".to_string(),
            workspace: None,
        }
    }

    #[tokio::test]
    async fn first_emit_writes_then_second_emit_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = minimal_manifest();
        let (tx, _rx): (EventSender, _) = cforge_events::channel();

        let first = emit(dir.path(), &manifest, &[], &["Debug".to_string()], &[], &tx)
            .await
            .unwrap();
        assert!(matches!(first, EmitOutcome::Written { .. }));

        let second = emit(dir.path(), &manifest, &[], &["Debug".to_string()], &[], &tx)
            .await
            .unwrap();
        assert_eq!(second, EmitOutcome::SkippedUpToDate);
    }

    #[tokio::test]
    async fn changed_manifest_triggers_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = minimal_manifest();
        let (tx, _rx): (EventSender, _) = cforge_events::channel();

        emit(dir.path(), &manifest, &[], &["Debug".to_string()], &[], &tx)
            .await
            .unwrap();
        manifest.version = "2.0.0".to_string();
        let second = emit(dir.path(), &manifest, &[], &["Debug".to_string()], &[], &tx)
            .await
            .unwrap();
        assert!(matches!(second, EmitOutcome::Written { .. }));
    }
}
