#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Workspace Orchestrator (component J): loads a workspace manifest,
//! computes a dependency-respecting build order, and drives every member
//! through the full single-project pipeline (resolve -> emit -> configure
//! -> build), wiring sibling include/library paths between members
//! (§4.10).

pub mod graph;

use cforge_driver::BuildOptions;
use cforge_errors::{Error, WorkspaceError};
use cforge_events::{
    AppEvent, EventEmitter, EventSender, FailureContext, Generator, WorkspaceEvent,
};
use cforge_process::ProcessSpawn;
use cforge_registry::RegistryLookup;
use cforge_resolver::{DependencyResolver, ResolveOptions};
use cforge_types::{ProjectManifest, WorkspaceManifest, WorkspaceMember};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

/// Tunables shared across every member's pipeline invocation (§4.10, §6
/// global flags).
#[derive(Debug, Clone)]
pub struct WorkspaceBuildOptions {
    pub build_config: String,
    pub jobs: usize,
    pub generator: Generator,
    pub keep_going: bool,
    pub update_dependencies: bool,
}

/// Outcome of building every workspace member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceBuildSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

/// Load the workspace manifest rooted at `workspace_root` and build every
/// member in dependency order, wiring each member's resolved dependencies'
/// include/library paths and sibling members into the next ones that
/// depend on it.
///
/// # Errors
/// Returns [`WorkspaceError::NotFound`] if `workspace_root` has no
/// `[workspace]` section, [`WorkspaceError::CycleDetected`]/
/// [`WorkspaceError::UnknownDependency`] if the member graph is invalid,
/// or the first failing member's error unless `options.keep_going` is set.
pub async fn build_workspace(
    spawner: &dyn ProcessSpawn,
    registry: &dyn RegistryLookup,
    workspace_root: &Path,
    options: &WorkspaceBuildOptions,
    events: &EventSender,
) -> Result<WorkspaceBuildSummary, Error> {
    let workspace = load_workspace(workspace_root).await?;

    events.emit(AppEvent::Workspace(WorkspaceEvent::Loaded {
        name: workspace.name.clone(),
        members: workspace.members.iter().map(|m| m.name.clone()).collect(),
    }));

    let order = match graph::topological_order(&workspace.members) {
        Ok(order) => order,
        Err(Error::Workspace(WorkspaceError::CycleDetected { chain })) => {
            events.emit(AppEvent::Workspace(WorkspaceEvent::CycleDetected {
                name: workspace.name.clone(),
                chain: chain.split(" -> ").map(str::to_string).collect(),
            }));
            return Err(WorkspaceError::CycleDetected { chain }.into());
        }
        Err(other) => return Err(other),
    };

    events.emit(AppEvent::Workspace(WorkspaceEvent::BuildOrderComputed {
        name: workspace.name.clone(),
        order: order.clone(),
    }));

    let total = order.len();
    let mut summary = WorkspaceBuildSummary::default();
    let mut failed_names: HashSet<String> = HashSet::new();

    for (index, member_name) in order.iter().enumerate() {
        let member = workspace
            .member(member_name)
            .ok_or_else(|| WorkspaceError::UnknownProject {
                name: member_name.clone(),
            })?;

        if options.keep_going {
            let closure = graph::dependency_closure(member_name, &workspace.members);
            let blocker = closure
                .iter()
                .find(|dep| *dep != member_name && failed_names.contains(*dep));
            if let Some(blocker) = blocker {
                events.emit(AppEvent::Workspace(WorkspaceEvent::MemberSkipped {
                    member: member_name.clone(),
                    because_of: blocker.clone(),
                }));
                summary.skipped.push(member_name.clone());
                continue;
            }
        }

        events.emit(AppEvent::Workspace(WorkspaceEvent::MemberStarted {
            member: member_name.clone(),
            index,
            total,
        }));

        let start = Instant::now();
        let sibling_deps: Vec<&WorkspaceMember> = member
            .depends_on
            .iter()
            .filter_map(|dep_name| workspace.member(dep_name))
            .collect();

        let outcome = build_member(
            spawner,
            registry,
            workspace_root,
            member,
            &sibling_deps,
            options,
            events,
        )
        .await;

        match outcome {
            Ok(()) => {
                events.emit(AppEvent::Workspace(WorkspaceEvent::MemberCompleted {
                    member: member_name.clone(),
                    duration: start.elapsed(),
                }));
                summary.succeeded.push(member_name.clone());
            }
            Err(error) => {
                failed_names.insert(member_name.clone());
                events.emit(AppEvent::Workspace(WorkspaceEvent::MemberFailed {
                    member: member_name.clone(),
                    failure: FailureContext::from(&error),
                }));
                summary.failed.push(member_name.clone());
                if !options.keep_going {
                    events.emit(AppEvent::Workspace(WorkspaceEvent::Completed {
                        name: workspace.name.clone(),
                        succeeded: summary.succeeded.len(),
                        failed: summary.failed.len(),
                        skipped: summary.skipped.len(),
                    }));
                    return Err(WorkspaceError::MemberBuildFailed {
                        member: member_name.clone(),
                    }
                    .into());
                }
            }
        }
    }

    events.emit(AppEvent::Workspace(WorkspaceEvent::Completed {
        name: workspace.name.clone(),
        succeeded: summary.succeeded.len(),
        failed: summary.failed.len(),
        skipped: summary.skipped.len(),
    }));

    Ok(summary)
}

/// Which member's executable the `run` command should invoke: the member
/// with `startup = true`, else the workspace's `default_startup`.
///
/// # Errors
/// Returns [`WorkspaceError::NoStartupProject`] if neither is set.
pub async fn startup_member(workspace_root: &Path) -> Result<String, Error> {
    let workspace = load_workspace(workspace_root).await?;
    workspace
        .startup_member()
        .map(|m| m.name.clone())
        .ok_or_else(|| WorkspaceError::NoStartupProject.into())
}

async fn load_workspace(workspace_root: &Path) -> Result<WorkspaceManifest, Error> {
    let loaded = cforge_manifest::load_workspace_dir(workspace_root).await?;
    loaded.manifest.workspace.ok_or_else(|| {
        WorkspaceError::NotFound {
            path: workspace_root.display().to_string(),
        }
        .into()
    })
}

/// Run one member's full pipeline: resolve its dependencies, emit its
/// `CMakeLists.txt`, configure, and build, with sibling include/library
/// paths passed as extra CMake cache entries (§4.10).
async fn build_member(
    spawner: &dyn ProcessSpawn,
    registry: &dyn RegistryLookup,
    workspace_root: &Path,
    member: &WorkspaceMember,
    sibling_deps: &[&WorkspaceMember],
    options: &WorkspaceBuildOptions,
    events: &EventSender,
) -> Result<(), Error> {
    let member_dir = workspace_root.join(&member.path);
    let loaded = cforge_manifest::load_project_dir(&member_dir).await?;
    let manifest: ProjectManifest = loaded.manifest;

    let resolver = DependencyResolver::new(
        spawner,
        registry,
        member_dir.clone(),
        &manifest.dependencies_directory,
    )
    .with_events(events.clone());
    let lock_path = member_dir.join(cforge_config::constants::DEFAULT_LOCK_FILE_NAME);
    let (resolved, _lock) = resolver
        .resolve_all(
            &manifest,
            &lock_path,
            ResolveOptions {
                update: options.update_dependencies,
            },
        )
        .await?;

    let build_configs: Vec<String> = vec![options.build_config.clone()];
    let workspace_dep_refs: Vec<&WorkspaceMember> = sibling_deps.to_vec();
    cforge_emitter::emit(
        &member_dir,
        &manifest,
        &resolved,
        &build_configs,
        &workspace_dep_refs,
        events,
    )
    .await?;

    let extra_cache_args = sibling_wiring_args(workspace_root, sibling_deps, &options.build_config);

    cforge_driver::configure(
        spawner,
        &member_dir,
        &member.name,
        options.generator,
        &options.build_config,
        &extra_cache_args,
        events,
    )
    .await?;

    let build_options = BuildOptions {
        build_config: options.build_config.clone(),
        jobs: options.jobs,
        timeout: None,
    };
    cforge_driver::build(spawner, &member_dir, &member.name, &build_options, events).await
}

/// Build the `-DCMAKE_INCLUDE_PATH=`, `-DCMAKE_LIBRARY_PATH=`, and
/// per-dependency `-DCFORGE_DEP_<name>=ON` / `-DCFORGE_<name>_INCLUDE=` /
/// `-DCFORGE_<name>_LIB=` arguments a member's configure step needs to see
/// its sibling members' build outputs (§4.10).
fn sibling_wiring_args(
    workspace_root: &Path,
    sibling_deps: &[&WorkspaceMember],
    build_config: &str,
) -> Vec<String> {
    if sibling_deps.is_empty() {
        return Vec::new();
    }

    let mut includes: Vec<String> = Vec::new();
    let mut libs: Vec<String> = Vec::new();
    let mut args: Vec<String> = Vec::new();

    for sibling in sibling_deps {
        let sibling_dir = workspace_root.join(&sibling.path);
        let include_dir = sibling_dir.display().to_string();
        let lib_dir = sibling_dir
            .join(format!("build-{build_config}"))
            .join("lib")
            .join(build_config)
            .display()
            .to_string();

        includes.push(include_dir.clone());
        libs.push(lib_dir.clone());

        args.push(format!("-DCFORGE_DEP_{}=ON", sibling.name));
        args.push(format!("-DCFORGE_{}_INCLUDE={include_dir}", sibling.name));
        args.push(format!("-DCFORGE_{}_LIB={lib_dir}", sibling.name));
    }

    args.push(format!("-DCMAKE_INCLUDE_PATH={}", includes.join(";")));
    args.push(format!("-DCMAKE_LIBRARY_PATH={}", libs.join(";")));
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, path: &str, depends_on: &[&str]) -> WorkspaceMember {
        WorkspaceMember {
            name: name.to_string(),
            path: path.into(),
            startup: false,
            inline_overrides: Default::default(),
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn sibling_wiring_args_are_empty_with_no_dependencies() {
        let root = Path::new("/workspace");
        assert!(sibling_wiring_args(root, &[], "Debug").is_empty());
    }

    #[test]
    fn sibling_wiring_args_name_each_dependency() {
        let root = Path::new("/workspace");
        let lib = member("corelib", "corelib", &[]);
        let args = sibling_wiring_args(root, &[&lib], "Release");
        assert!(args.iter().any(|a| a == "-DCFORGE_DEP_corelib=ON"));
        assert!(args.iter().any(|a| a.starts_with("-DCFORGE_corelib_INCLUDE=")));
        assert!(args.iter().any(|a| a.starts_with("-DCFORGE_corelib_LIB=")));
        assert!(args.iter().any(|a| a.starts_with("-DCMAKE_INCLUDE_PATH=")));
        assert!(args.iter().any(|a| a.starts_with("-DCMAKE_LIBRARY_PATH=")));
    }

    use async_trait::async_trait;
    use cforge_process::{LineCallback, ProcessOutput, Spawn};
    use cforge_registry::{RegistryEntry, RegistryLookup};
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    struct AlwaysSucceeds;

    #[async_trait]
    impl ProcessSpawn for AlwaysSucceeds {
        async fn spawn_streaming(
            &self,
            _spawn: Spawn,
            _on_stdout_line: LineCallback<'_>,
            _on_stderr_line: LineCallback<'_>,
            _cancel: Option<&CancellationToken>,
        ) -> Result<ProcessOutput, Error> {
            Ok(ProcessOutput {
                status: ExitStatus::from_raw(0),
                stdout: String::new(),
                stderr: String::new(),
                duration: Duration::from_millis(1),
            })
        }
    }

    struct EmptyRegistry;

    #[async_trait]
    impl RegistryLookup for EmptyRegistry {
        async fn lookup(&self, name: &str) -> Result<RegistryEntry, Error> {
            Err(cforge_errors::RegistryError::EntryMissing {
                name: name.to_string(),
            }
            .into())
        }
    }

    const CORELIB_MANIFEST: &str = r#"
name = "corelib"
version = "0.1.0"
output_kind = "static_lib"
cpp_standard = "20"
sources = ["src/core.cpp"]
"#;

    const APP_MANIFEST: &str = r#"
name = "app"
version = "0.1.0"
output_kind = "executable"
cpp_standard = "20"
sources = ["src/main.cpp"]
"#;

    fn workspace_toml() -> String {
        r#"
name = "demo-workspace"
version = "0.1.0"
output_kind = "executable"
cpp_standard = "20"

[workspace]
name = "demo-workspace"
default_startup = "app"

[[workspace.members]]
name = "corelib"
path = "corelib"

[[workspace.members]]
name = "app"
path = "app"
depends_on = ["corelib"]
"#
        .to_string()
    }

    async fn write_demo_workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("cforge.toml"), workspace_toml())
            .await
            .unwrap();
        tokio::fs::create_dir_all(dir.path().join("corelib"))
            .await
            .unwrap();
        tokio::fs::write(
            dir.path().join("corelib").join("cforge.toml"),
            CORELIB_MANIFEST,
        )
        .await
        .unwrap();
        tokio::fs::create_dir_all(dir.path().join("app")).await.unwrap();
        tokio::fs::write(dir.path().join("app").join("cforge.toml"), APP_MANIFEST)
            .await
            .unwrap();
        dir
    }

    #[tokio::test]
    async fn builds_members_in_dependency_order() {
        let dir = write_demo_workspace().await;
        let spawner = AlwaysSucceeds;
        let registry = EmptyRegistry;
        let (tx, _rx): (EventSender, _) = cforge_events::channel();
        let options = WorkspaceBuildOptions {
            build_config: "Debug".to_string(),
            jobs: 4,
            generator: Generator::UnixMakefiles,
            keep_going: false,
            update_dependencies: false,
        };

        let summary = build_workspace(&spawner, &registry, dir.path(), &options, &tx)
            .await
            .unwrap();

        assert_eq!(summary.succeeded, vec!["corelib".to_string(), "app".to_string()]);
        assert!(summary.failed.is_empty());
    }

    #[tokio::test]
    async fn startup_member_resolves_default_startup() {
        let dir = write_demo_workspace().await;
        let name = startup_member(dir.path()).await.unwrap();
        assert_eq!(name, "app");
    }
}
