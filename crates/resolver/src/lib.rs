#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Dependency Resolver (component E).
//!
//! Walks a project manifest's declared dependencies, materializes each one
//! according to its source kind (git clone, registry lookup + clone,
//! subdirectory validation, system/vcpkg binding without materialization),
//! and produces a resolved dependency set plus an updated lock file (§4.5).
//!
//! A lock file present at invocation start is treated as authoritative for
//! git/registry dependencies unless the caller passes `update: true`: the
//! previously resolved commit is checked out again rather than re-resolved
//! against the manifest constraint.

mod git;
mod lock;
mod sentinel;
mod subdirectory;
mod system;
mod vcpkg;

use cforge_errors::{Error, ResolverError};
use cforge_events::{AppEvent, DependencySource, EventEmitter, EventSender, ResolveEvent};
use cforge_process::ProcessSpawn;
use cforge_registry::RegistryLookup;
use cforge_types::manifest::{Dependency, GitRef};
use cforge_types::{
    CmakeBinding, DependencySourceKind, LockEntry, LockFile, ProjectManifest, ResolvedDependency,
    Version, VersionConstraint,
};
use sentinel::MaterializationGuard;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn as_event_source(kind: DependencySourceKind) -> DependencySource {
    match kind {
        DependencySourceKind::Git => DependencySource::Git,
        DependencySourceKind::Registry => DependencySource::Registry,
        DependencySourceKind::Subdirectory => DependencySource::Subdirectory,
        DependencySourceKind::System => DependencySource::System,
        DependencySourceKind::Vcpkg => DependencySource::Vcpkg,
    }
}

/// Options controlling how [`DependencyResolver::resolve_all`] treats an
/// existing lock file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Ignore the existing lock file's pinned commits/versions and
    /// re-resolve everything against the manifest constraints.
    pub update: bool,
}

pub struct DependencyResolver<'a> {
    spawner: &'a dyn ProcessSpawn,
    registry: &'a dyn RegistryLookup,
    project_root: PathBuf,
    deps_dir: PathBuf,
    events: Option<EventSender>,
}

impl<'a> DependencyResolver<'a> {
    #[must_use]
    pub fn new(
        spawner: &'a dyn ProcessSpawn,
        registry: &'a dyn RegistryLookup,
        project_root: PathBuf,
        dependencies_directory: &str,
    ) -> Self {
        let deps_dir = project_root.join(dependencies_directory);
        Self {
            spawner,
            registry,
            project_root,
            deps_dir,
            events: None,
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Resolve every dependency declared in `manifest`, writing the updated
    /// lock file to `lock_path`.
    ///
    /// # Errors
    /// Returns the first dependency's resolution error. Partial progress is
    /// not written back to disk.
    pub async fn resolve_all(
        &self,
        manifest: &ProjectManifest,
        lock_path: &Path,
        options: ResolveOptions,
    ) -> Result<(Vec<ResolvedDependency>, LockFile), Error> {
        let start = Instant::now();
        if let Some(e) = &self.events {
            e.emit(AppEvent::Resolve(ResolveEvent::Started {
                project: manifest.name.clone(),
                count: manifest.dependencies.len(),
            }));
        }

        let existing_lock = lock::load(lock_path).await?;
        let mut new_lock = LockFile::new(chrono::Utc::now().to_rfc3339());
        let mut resolved = Vec::with_capacity(manifest.dependencies.len());

        for dep in &manifest.dependencies {
            let name = dep.name().to_string();
            let source = as_event_source(source_kind(dep));
            if let Some(e) = &self.events {
                e.emit(AppEvent::Resolve(ResolveEvent::DependencyStarted {
                    name: name.clone(),
                    source,
                }));
            }

            let dep_start = Instant::now();
            match self
                .resolve_one(dep, existing_lock.as_ref(), options)
                .await
            {
                Ok((resolved_dep, lock_entry)) => {
                    if let Some(entry) = &lock_entry {
                        if !options.update {
                            lock::verify_entry(
                                existing_lock.as_ref().unwrap_or(&new_lock),
                                &name,
                                entry,
                            )?;
                        }
                        new_lock.insert(name.clone(), entry.clone());
                    }
                    if let Some(e) = &self.events {
                        e.emit(AppEvent::Resolve(ResolveEvent::DependencyCompleted {
                            name: name.clone(),
                            source,
                            duration: dep_start.elapsed(),
                        }));
                    }
                    resolved.push(resolved_dep);
                }
                Err(err) => {
                    if let Some(e) = &self.events {
                        e.emit(AppEvent::Resolve(ResolveEvent::DependencyFailed {
                            name: name.clone(),
                            failure: cforge_events::FailureContext::from(&err),
                        }));
                        e.emit(AppEvent::Resolve(ResolveEvent::Failed {
                            project: manifest.name.clone(),
                            failure: cforge_events::FailureContext::from(&err),
                        }));
                    }
                    return Err(err);
                }
            }
        }

        lock::save(lock_path, &new_lock).await?;
        if let Some(e) = &self.events {
            e.emit(AppEvent::Resolve(ResolveEvent::LockFileWritten {
                path: lock_path.display().to_string(),
                entries: new_lock.dependencies.len(),
            }));
            e.emit(AppEvent::Resolve(ResolveEvent::Completed {
                project: manifest.name.clone(),
                duration: start.elapsed(),
            }));
        }

        Ok((resolved, new_lock))
    }

    async fn resolve_one(
        &self,
        dep: &Dependency,
        existing_lock: Option<&LockFile>,
        options: ResolveOptions,
    ) -> Result<(ResolvedDependency, Option<LockEntry>), Error> {
        match dep {
            Dependency::Git {
                name,
                url,
                git_ref,
                shallow,
                target,
                ..
            } => {
                let pinned = (!options.update)
                    .then(|| existing_lock.and_then(|l| l.get(name)))
                    .flatten();
                let effective_ref = match pinned {
                    Some(entry) => GitRef::Commit(entry.resolved.clone()),
                    None => git_ref
                        .resolve()
                        .unwrap_or_else(|| GitRef::Branch("main".to_string())),
                };

                let _guard = MaterializationGuard::acquire(&self.deps_dir, name)?;
                let dest = self.deps_dir.join(name);
                let sha = self
                    .materialize_git(name, url, &dest, &effective_ref, *shallow)
                    .await?;

                if let Some(e) = &self.events {
                    e.emit(AppEvent::Resolve(ResolveEvent::VersionSelected {
                        name: name.clone(),
                        constraint: display_git_ref(git_ref),
                        resolved: sha.clone(),
                    }));
                }

                let resolved_dep = ResolvedDependency {
                    name: name.clone(),
                    source: DependencySourceKind::Git,
                    resolved_version: Some(sha.clone()),
                    path: Some(dest.clone()),
                    content_hash: None,
                    binding: CmakeBinding {
                        link_target: target.clone(),
                        add_subdirectory_path: Some(dest.display().to_string()),
                        ..Default::default()
                    },
                };
                let lock_entry = LockEntry {
                    source: "git".to_string(),
                    url: url.clone(),
                    version: display_git_ref(git_ref),
                    resolved: sha,
                    checksum: None,
                };
                Ok((resolved_dep, Some(lock_entry)))
            }
            Dependency::Registry { name, version } => {
                let pinned = (!options.update)
                    .then(|| existing_lock.and_then(|l| l.get(name)))
                    .flatten();

                let entry = self.registry.lookup(name).await?;
                let resolved_version = match pinned {
                    Some(lock_entry) => lock_entry.resolved.clone(),
                    None => {
                        let constraint = VersionConstraint::parse(version)
                            .map_err(cforge_errors::Error::Version)?;
                        let parsed: Vec<Version> = entry
                            .versions
                            .iter()
                            .filter_map(|v| Version::parse(&v.version).ok())
                            .collect();
                        let best = constraint.best_match(parsed.iter()).ok_or_else(|| {
                            ResolverError::NoMatchingVersion {
                                name: name.clone(),
                                constraint: version.clone(),
                            }
                        })?;
                        best.to_string()
                    }
                };
                let tag = entry.tag_for_version(&resolved_version).ok_or_else(|| {
                    ResolverError::NoMatchingVersion {
                        name: name.clone(),
                        constraint: version.clone(),
                    }
                })?;

                let _guard = MaterializationGuard::acquire(&self.deps_dir, name)?;
                let dest = self.deps_dir.join(name);
                let sha = self
                    .materialize_git(name, &entry.repository_url, &dest, &GitRef::Tag(tag.clone()), false)
                    .await?;

                if let Some(e) = &self.events {
                    e.emit(AppEvent::Resolve(ResolveEvent::VersionSelected {
                        name: name.clone(),
                        constraint: version.clone(),
                        resolved: resolved_version.clone(),
                    }));
                }

                let add_subdirectory_path = match &entry.cmake.cmake_subdir {
                    Some(sub) => dest.join(sub).display().to_string(),
                    None => dest.display().to_string(),
                };
                let resolved_dep = ResolvedDependency {
                    name: name.clone(),
                    source: DependencySourceKind::Registry,
                    resolved_version: Some(resolved_version.clone()),
                    path: Some(dest),
                    content_hash: None,
                    binding: CmakeBinding {
                        link_target: entry.cmake.target_name.clone(),
                        cmake_options: entry.cmake.options.clone(),
                        add_subdirectory_path: Some(add_subdirectory_path),
                        ..Default::default()
                    },
                };
                let lock_entry = LockEntry {
                    source: "registry".to_string(),
                    url: entry.repository_url.clone(),
                    version: version.clone(),
                    resolved: resolved_version,
                    checksum: None,
                };
                Ok((resolved_dep, Some(lock_entry)))
            }
            Dependency::Subdirectory {
                name,
                path,
                target,
                options: opts,
            } => {
                let resolved_dep =
                    subdirectory::resolve(&self.project_root, name, path, target, opts).await?;
                Ok((resolved_dep, None))
            }
            Dependency::System {
                name,
                kind,
                components,
                target,
                include_dirs,
                lib_dirs,
                libraries,
                defines,
            } => {
                let resolved_dep = system::resolve(
                    name,
                    *kind,
                    components,
                    target.as_deref(),
                    include_dirs,
                    lib_dirs,
                    libraries,
                    defines,
                );
                Ok((resolved_dep, None))
            }
            Dependency::Vcpkg {
                name,
                package,
                triplet,
            } => {
                let vcpkg_root = std::env::var("VCPKG_ROOT").ok();
                let resolved_dep =
                    vcpkg::resolve(name, package, triplet.as_deref(), vcpkg_root.as_deref())?;
                Ok((resolved_dep, None))
            }
        }
    }

    async fn materialize_git(
        &self,
        name: &str,
        url: &str,
        dest: &Path,
        git_ref: &GitRef,
        shallow: bool,
    ) -> Result<String, Error> {
        if dest.join(".git").exists() {
            git::fetch_tags(self.spawner, name, dest).await?;
        } else {
            if let Some(e) = &self.events {
                e.emit(AppEvent::Resolve(ResolveEvent::DependencyProgress {
                    name: name.to_string(),
                    message: format!("cloning {url}"),
                }));
            }
            git::clone(self.spawner, name, url, dest, shallow).await?;
            git::fetch_tags(self.spawner, name, dest).await?;
        }
        git::checkout(self.spawner, name, dest, git_ref).await?;
        git::rev_parse_head(self.spawner, name, dest).await
    }
}

fn source_kind(dep: &Dependency) -> DependencySourceKind {
    match dep {
        Dependency::Git { .. } => DependencySourceKind::Git,
        Dependency::Registry { .. } => DependencySourceKind::Registry,
        Dependency::Subdirectory { .. } => DependencySourceKind::Subdirectory,
        Dependency::System { .. } => DependencySourceKind::System,
        Dependency::Vcpkg { .. } => DependencySourceKind::Vcpkg,
    }
}

fn display_git_ref(spec: &cforge_types::manifest::GitRefSpec) -> String {
    if let Some(c) = &spec.commit {
        format!("commit:{c}")
    } else if let Some(t) = &spec.tag {
        format!("tag:{t}")
    } else if let Some(b) = &spec.branch {
        format!("branch:{b}")
    } else {
        "branch:main".to_string()
    }
}
