//! cforge binary entry point: argument parsing, tracing setup, and command
//! dispatch over the library crates (components A through O).

mod cli;
mod error;
mod events;
mod logging;

use clap::Parser;
use cforge_config::Config;
use cforge_driver::BuildOptions;
use cforge_events::{AppEvent, EventEmitter, EventReceiver, EventSender, Generator, ResolveEvent};
use cforge_process::{ProcessSpawn, Spawn, Spawner};
use cforge_registry::{RegistryClient, RegistryLookup};
use cforge_resolver::{DependencyResolver, ResolveOptions};
use cforge_types::{Dependency, GitRefSpec, OutputKind, ProjectManifest};
use cli::{Cli, Commands, GlobalArgs};
use console::style;
use error::CliError;
use events::EventHandler;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tokio::select;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.global.verbose, cli.global.quiet);

    match run(cli).await {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            eprintln!("{} {err}", style("error:").red().bold());
            if let Some(hint) = err.hint() {
                eprintln!("{} {hint}", style("hint:").cyan());
            }
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<i32, CliError> {
    let mut config = Config::load_or_default(None).await?;
    config.merge_env()?;

    let colors_enabled = match cli.global.color.unwrap_or(config.general.color) {
        cforge_types::ColorChoice::Always => true,
        cforge_types::ColorChoice::Never => false,
        cforge_types::ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
    };
    let mut handler = EventHandler::new(colors_enabled, cli.global.verbose, cli.global.quiet);

    let (tx, rx): (EventSender, EventReceiver) = cforge_events::channel();
    let mut command_future = Box::pin(execute_command(cli.command, cli.global, config, tx));
    let mut rx = rx;

    loop {
        select! {
            result = &mut command_future => {
                while let Ok(event) = rx.try_recv() {
                    handler.handle_event(event);
                }
                return result;
            }
            event = rx.recv() => {
                match event {
                    Some(event) => handler.handle_event(event),
                    None => {}
                }
            }
        }
    }
}

fn resolve_project_dir(global: &GlobalArgs) -> PathBuf {
    global
        .project
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn pick_generator(explicit: Option<&str>) -> Generator {
    if let Some(name) = explicit {
        return match name.to_lowercase().as_str() {
            "ninja" | "ninja multi-config" => Generator::NinjaMultiConfig,
            "visual studio" | "msvc" | "vs" => Generator::VisualStudio,
            _ => Generator::UnixMakefiles,
        };
    }
    let platform = cforge_emitter::probe::resolve_platform(None);
    cforge_driver::generator::select_generator(platform, cforge_driver::generator::ninja_on_path())
}

async fn load_manifest(project_dir: &Path) -> Result<ProjectManifest, CliError> {
    let loaded = cforge_manifest::load_project_dir(project_dir).await?;
    Ok(loaded.manifest)
}

async fn build_registry(config: &Config, events: &EventSender) -> Result<RegistryClient<cforge_registry::ReqwestTransport>, CliError> {
    let cache_path = config
        .config_dir()?
        .join(cforge_config::constants::REGISTRY_CACHE_FILE_NAME);
    let transport = cforge_registry::ReqwestTransport::new(
        Duration::from_secs(config.network.timeout_secs),
        config.network.retries,
    )?;
    Ok(RegistryClient::new(
        transport,
        config.network.registry_index_url.clone(),
        cache_path,
        config.network.index_max_age_days,
    )
    .with_events(events.clone()))
}

async fn resolve_and_emit(
    spawner: &dyn ProcessSpawn,
    registry: &dyn RegistryLookup,
    project_dir: &Path,
    manifest: &ProjectManifest,
    build_config: &str,
    update: bool,
    events: &EventSender,
) -> Result<Vec<cforge_types::ResolvedDependency>, CliError> {
    let resolver = DependencyResolver::new(
        spawner,
        registry,
        project_dir.to_path_buf(),
        &manifest.dependencies_directory,
    )
    .with_events(events.clone());
    let lock_path = project_dir.join(cforge_config::constants::DEFAULT_LOCK_FILE_NAME);
    let (resolved, _lock) = resolver
        .resolve_all(manifest, &lock_path, ResolveOptions { update })
        .await?;

    cforge_emitter::emit(
        project_dir,
        manifest,
        &resolved,
        &[build_config.to_string()],
        &[],
        events,
    )
    .await?;

    Ok(resolved)
}

async fn configure_and_build(
    spawner: &dyn ProcessSpawn,
    project_dir: &Path,
    manifest: &ProjectManifest,
    build_config: &str,
    jobs: usize,
    generator: Generator,
    extra_cache_args: &[String],
    events: &EventSender,
) -> Result<(), CliError> {
    cforge_driver::configure(
        spawner,
        project_dir,
        &manifest.name,
        generator,
        build_config,
        extra_cache_args,
        events,
    )
    .await?;

    let options = BuildOptions {
        build_config: build_config.to_string(),
        jobs,
        timeout: None,
    };
    cforge_driver::build(spawner, project_dir, &manifest.name, &options, events).await?;
    Ok(())
}

async fn execute_command(
    command: Commands,
    global: GlobalArgs,
    config: Config,
    events: EventSender,
) -> Result<i32, CliError> {
    let project_dir = resolve_project_dir(&global);
    let build_config = global.build_config.clone();
    let jobs = config.resolve_jobs(if global.jobs == 0 { None } else { Some(global.jobs) });
    let spawner = Spawner;

    match command {
        Commands::Init { name, path, kind } => {
            let target_dir = path.unwrap_or_else(|| PathBuf::from("."));
            let project_name = name.unwrap_or_else(|| {
                target_dir
                    .canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                    .unwrap_or_else(|| "app".to_string())
            });
            let output_kind = match kind.as_str() {
                "executable" => OutputKind::Executable,
                "static_lib" => OutputKind::StaticLib,
                "shared_lib" => OutputKind::SharedLib,
                "header_only" => OutputKind::HeaderOnly,
                other => {
                    return Err(CliError::InvalidArguments(format!(
                        "unknown output kind `{other}`; expected executable, static_lib, shared_lib, or header_only"
                    )))
                }
            };
            scaffold_project(&target_dir, &project_name, output_kind).await?;
            Ok(0)
        }

        Commands::Build { generator, keep_going } => {
            let manifest = load_manifest(&project_dir).await?;
            if manifest.workspace.is_some() {
                let registry = build_registry(&config, &events).await?;
                let options = cforge_workspace::WorkspaceBuildOptions {
                    build_config,
                    jobs,
                    generator: pick_generator(generator.as_deref()),
                    keep_going,
                    update_dependencies: false,
                };
                let summary =
                    cforge_workspace::build_workspace(&spawner, &registry, &project_dir, &options, &events)
                        .await?;
                Ok(if summary.failed.is_empty() { 0 } else { 1 })
            } else {
                let registry = build_registry(&config, &events).await?;
                let resolved =
                    resolve_and_emit(&spawner, &registry, &project_dir, &manifest, &build_config, false, &events)
                        .await?;
                let _ = resolved;
                configure_and_build(
                    &spawner,
                    &project_dir,
                    &manifest,
                    &build_config,
                    jobs,
                    pick_generator(generator.as_deref()),
                    &[],
                    &events,
                )
                .await?;
                Ok(0)
            }
        }

        Commands::Run { args } => {
            let manifest = load_manifest(&project_dir).await?;
            let registry = build_registry(&config, &events).await?;
            resolve_and_emit(&spawner, &registry, &project_dir, &manifest, &build_config, false, &events).await?;
            configure_and_build(
                &spawner,
                &project_dir,
                &manifest,
                &build_config,
                jobs,
                pick_generator(None),
                &[],
                &events,
            )
            .await?;

            let build_dir = project_dir.join(format!("build-{build_config}"));
            let binary = build_dir.join("bin").join(&build_config).join(&manifest.name);
            let spawn = Spawn::new(binary.display().to_string())
                .args(args)
                .cwd(project_dir.clone());
            let output = spawner
                .spawn_streaming(
                    spawn,
                    Box::new(|line| println!("{line}")),
                    Box::new(|line| eprintln!("{line}")),
                    None,
                )
                .await?;
            Ok(if output.success() { 0 } else { output.exit_code().unwrap_or(1) })
        }

        Commands::Test { filter, timeout } => {
            let manifest = load_manifest(&project_dir).await?;
            let registry = build_registry(&config, &events).await?;
            resolve_and_emit(&spawner, &registry, &project_dir, &manifest, &build_config, false, &events).await?;
            configure_and_build(
                &spawner,
                &project_dir,
                &manifest,
                &build_config,
                jobs,
                pick_generator(None),
                &[],
                &events,
            )
            .await?;

            let _ = filter;
            let targets_dir = project_dir.join("tests");
            let summary = cforge_runner::run_all(
                &spawner,
                &project_dir,
                &build_config,
                &targets_dir,
                Duration::from_secs(timeout),
                &manifest.name,
                &events,
            )
            .await?;
            Ok(if summary.failed == 0 && summary.timed_out == 0 { 0 } else { 1 })
        }

        Commands::Bench { filter, timeout } => {
            let manifest = load_manifest(&project_dir).await?;
            let registry = build_registry(&config, &events).await?;
            resolve_and_emit(&spawner, &registry, &project_dir, &manifest, &build_config, false, &events).await?;
            configure_and_build(
                &spawner,
                &project_dir,
                &manifest,
                &build_config,
                jobs,
                pick_generator(None),
                &[],
                &events,
            )
            .await?;

            let _ = filter;
            let targets_dir = project_dir.join("bench");
            let summary = cforge_runner::run_all(
                &spawner,
                &project_dir,
                &build_config,
                &targets_dir,
                Duration::from_secs(timeout),
                &manifest.name,
                &events,
            )
            .await?;
            Ok(if summary.failed == 0 && summary.timed_out == 0 { 0 } else { 1 })
        }

        Commands::Clean { all } => {
            for entry in glob_build_dirs(&project_dir).await {
                let _ = tokio::fs::remove_dir_all(&entry).await;
            }
            if all {
                let _ = tokio::fs::remove_file(project_dir.join(cforge_config::constants::DEFAULT_HASH_CACHE_FILE_NAME)).await;
                let manifest = load_manifest(&project_dir).await?;
                let _ = tokio::fs::remove_dir_all(project_dir.join(&manifest.dependencies_directory)).await;
            }
            Ok(0)
        }

        Commands::Package => {
            let manifest = load_manifest(&project_dir).await?;
            let build_dir = project_dir.join(format!("build-{build_config}"));
            let output = spawner
                .spawn_streaming(
                    Spawn::new("cpack").cwd(build_dir),
                    Box::new(|line| println!("{line}")),
                    Box::new(|line| eprintln!("{line}")),
                    None,
                )
                .await?;
            let _ = manifest;
            Ok(if output.success() { 0 } else { 1 })
        }

        Commands::Deps => {
            let manifest = load_manifest(&project_dir).await?;
            print_dependency_table(&manifest);
            Ok(0)
        }

        Commands::Lock { verify, clean, force } => {
            let lock_path = project_dir.join(cforge_config::constants::DEFAULT_LOCK_FILE_NAME);
            if clean {
                let _ = tokio::fs::remove_file(&lock_path).await;
                let manifest = load_manifest(&project_dir).await?;
                let _ = tokio::fs::remove_dir_all(project_dir.join(&manifest.dependencies_directory)).await;
                return Ok(0);
            }

            let manifest = load_manifest(&project_dir).await?;
            let registry = build_registry(&config, &events).await?;
            events.emit(AppEvent::Resolve(ResolveEvent::LockVerifyStarted {
                project: manifest.name.clone(),
            }));
            resolve_and_emit(&spawner, &registry, &project_dir, &manifest, &build_config, force, &events).await?;
            if verify {
                events.emit(AppEvent::Resolve(ResolveEvent::LockVerifyPassed {
                    project: manifest.name.clone(),
                }));
            }
            Ok(0)
        }

        Commands::Install => {
            let manifest = load_manifest(&project_dir).await?;
            let registry = build_registry(&config, &events).await?;
            resolve_and_emit(&spawner, &registry, &project_dir, &manifest, &build_config, false, &events).await?;
            configure_and_build(
                &spawner,
                &project_dir,
                &manifest,
                &build_config,
                jobs,
                pick_generator(None),
                &[],
                &events,
            )
            .await?;

            let build_dir = project_dir.join(format!("build-{build_config}"));
            let output = spawner
                .spawn_streaming(
                    Spawn::new("cmake")
                        .arg("--install")
                        .arg(build_dir.display().to_string())
                        .arg("--config")
                        .arg(&build_config),
                    Box::new(|line| println!("{line}")),
                    Box::new(|line| eprintln!("{line}")),
                    None,
                )
                .await?;
            Ok(if output.success() { 0 } else { 1 })
        }

        Commands::Update => {
            let manifest = load_manifest(&project_dir).await?;
            let registry = build_registry(&config, &events).await?;
            resolve_and_emit(&spawner, &registry, &project_dir, &manifest, &build_config, true, &events).await?;
            Ok(0)
        }

        Commands::Add { spec } => {
            let mut manifest = load_manifest(&project_dir).await?;
            let dep = parse_dependency_spec(&spec)?;
            if manifest.dependencies.iter().any(|d| d.name() == dep.name()) {
                return Err(CliError::InvalidArguments(format!(
                    "dependency `{}` is already declared",
                    dep.name()
                )));
            }
            manifest.dependencies.push(dep);
            write_manifest(&project_dir, &manifest).await?;
            Ok(0)
        }

        Commands::Remove { name } => {
            let mut manifest = load_manifest(&project_dir).await?;
            let before = manifest.dependencies.len();
            manifest.dependencies.retain(|d| d.name() != name);
            if manifest.dependencies.len() == before {
                return Err(CliError::InvalidArguments(format!("no dependency named `{name}`")));
            }
            write_manifest(&project_dir, &manifest).await?;
            Ok(0)
        }

        Commands::Ide => {
            let manifest = load_manifest(&project_dir).await?;
            configure_and_build(
                &spawner,
                &project_dir,
                &manifest,
                &build_config,
                jobs,
                pick_generator(None),
                &["-DCMAKE_EXPORT_COMPILE_COMMANDS=ON".to_string()],
                &events,
            )
            .await?;
            let build_dir = project_dir.join(format!("build-{build_config}"));
            let generated = build_dir.join("compile_commands.json");
            let target = project_dir.join("compile_commands.json");
            if generated.exists() {
                tokio::fs::copy(&generated, &target).await?;
            }
            Ok(0)
        }

        Commands::List => {
            let manifest = load_manifest(&project_dir).await?;
            if let Some(workspace) = &manifest.workspace {
                println!("workspace {}", workspace.name);
                for member in &workspace.members {
                    let marker = if Some(member.name.as_str()) == workspace.default_startup.as_deref() || member.startup {
                        "*"
                    } else {
                        " "
                    };
                    println!("  {marker} {} ({})", member.name, member.path.display());
                }
            } else {
                print_dependency_table(&manifest);
            }
            Ok(0)
        }

        Commands::Circular { include_deps, workspace, json, limit } => {
            let manifest = load_manifest(&project_dir).await?;
            let mut options = cforge_analyzer::AnalyzerOptions::default();
            if include_deps {
                options.excluded_dirs.retain(|d| d != &manifest.dependencies_directory);
            }

            let mut reports = Vec::new();
            if workspace {
                let loaded = cforge_manifest::load_workspace_dir(&project_dir).await?;
                let ws = loaded.manifest.workspace.ok_or_else(|| {
                    CliError::InvalidArguments("--workspace requires a [workspace] manifest".to_string())
                })?;
                for member in &ws.members {
                    let member_dir = project_dir.join(&member.path);
                    let report = cforge_analyzer::analyze(&member_dir, &member.name, &options, &events).await?;
                    reports.push(report);
                }
            } else {
                let report = cforge_analyzer::analyze(&project_dir, &manifest.name, &options, &events).await?;
                reports.push(report);
            }

            let mut total_chains = 0usize;
            for mut report in reports {
                if let Some(limit) = limit {
                    report.chains.truncate(limit);
                }
                total_chains += report.chains.len();
                if json {
                    println!("{}", cforge_analyzer::render_json(&report));
                } else {
                    print!("{}", cforge_analyzer::render_tree(&report));
                }
            }
            Ok(if total_chains == 0 { 0 } else { 1 })
        }

        Commands::Version => {
            println!("cforge {}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

/// Every `build-*` directory directly under `project_dir` (one per build
/// configuration).
async fn glob_build_dirs(project_dir: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let Ok(mut entries) = tokio::fs::read_dir(project_dir).await else {
        return dirs;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with("build-") {
            dirs.push(entry.path());
        }
    }
    dirs
}

fn print_dependency_table(manifest: &ProjectManifest) {
    use comfy_table::Table;
    let mut table = Table::new();
    table.set_header(vec!["name", "source", "version"]);
    for dep in &manifest.dependencies {
        let (source, version) = match dep {
            Dependency::Git { url, .. } => ("git".to_string(), url.clone()),
            Dependency::Registry { version, .. } => ("registry".to_string(), version.clone()),
            Dependency::Subdirectory { path, .. } => ("subdirectory".to_string(), path.clone()),
            Dependency::System { .. } => ("system".to_string(), String::new()),
            Dependency::Vcpkg { package, .. } => ("vcpkg".to_string(), package.clone()),
        };
        table.add_row(vec![dep.name().to_string(), source, version]);
    }
    println!("{table}");
}

/// Parse an `Add` dependency spec: `name`, `name@version` (registry), or
/// `git:name=url#ref` (git, `ref` optional and defaulting to `main`).
fn parse_dependency_spec(spec: &str) -> Result<Dependency, CliError> {
    if let Some(rest) = spec.strip_prefix("git:") {
        let (name, remainder) = rest.split_once('=').ok_or_else(|| {
            CliError::InvalidArguments(format!("invalid git dependency spec `{spec}`; expected git:name=url[#ref]"))
        })?;
        let (url, git_ref) = match remainder.split_once('#') {
            Some((url, r)) => (url.to_string(), Some(r.to_string())),
            None => (remainder.to_string(), None),
        };
        return Ok(Dependency::Git {
            name: name.to_string(),
            url,
            git_ref: GitRefSpec { commit: None, tag: None, branch: git_ref },
            shallow: true,
            include: true,
            link: true,
            target: None,
        });
    }

    if let Some((name, version)) = spec.split_once('@') {
        return Ok(Dependency::Registry {
            name: name.to_string(),
            version: version.to_string(),
        });
    }

    Ok(Dependency::Registry {
        name: spec.to_string(),
        version: "*".to_string(),
    })
}

async fn write_manifest(project_dir: &Path, manifest: &ProjectManifest) -> Result<(), CliError> {
    let path = project_dir.join(cforge_config::constants::MANIFEST_FILE_NAME);
    let rendered = toml::to_string_pretty(manifest).map_err(|e| {
        CliError::InvalidArguments(format!("failed to render manifest: {e}"))
    })?;
    tokio::fs::write(path, rendered).await?;
    Ok(())
}

async fn scaffold_project(target_dir: &Path, name: &str, kind: OutputKind) -> Result<(), CliError> {
    tokio::fs::create_dir_all(target_dir.join("src")).await?;

    let main_file = match kind {
        OutputKind::Executable => "src/main.cpp",
        _ => "src/lib.cpp",
    };
    let main_contents = match kind {
        OutputKind::Executable => "#include <iostream>\n\nint main() {\n    std::cout << \"hello, cforge\\n\";\n    return 0;\n}\n".to_string(),
        _ => format!("// {name}\n"),
    };
    tokio::fs::write(target_dir.join(main_file), main_contents).await?;

    let manifest = format!(
        "name = \"{name}\"\nversion = \"0.1.0\"\noutput_kind = \"{}\"\ncpp_standard = \"20\"\nsources = [\"{main_file}\"]\n",
        kind.as_str()
    );
    tokio::fs::write(target_dir.join(cforge_config::constants::MANIFEST_FILE_NAME), manifest).await?;
    Ok(())
}
