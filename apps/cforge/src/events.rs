//! Rendering [`AppEvent`]s to the terminal.

use cforge_events::{
    AnalyzerEvent, AppEvent, BuildEvent, ConfigureEvent, EmitEvent, GeneralEvent, ManifestEvent,
    RegistryEvent, ResolveEvent, TestEvent, TestStatus, WorkspaceEvent,
};
use console::style;

/// Consumes [`AppEvent`]s emitted while a command runs and prints a
/// human-readable line for each, honoring verbosity and quiet settings.
pub struct EventHandler {
    verbose: bool,
    quiet: bool,
    colors_enabled: bool,
}

impl EventHandler {
    #[must_use]
    pub fn new(colors_enabled: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            colors_enabled,
        }
    }

    fn info(&self, line: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        println!("{}", line.as_ref());
    }

    fn ok(&self, line: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        if self.colors_enabled {
            println!("{} {}", style("==>").green().bold(), line.as_ref());
        } else {
            println!("==> {}", line.as_ref());
        }
    }

    fn warn(&self, line: impl AsRef<str>) {
        if self.colors_enabled {
            eprintln!("{} {}", style("warning:").yellow().bold(), line.as_ref());
        } else {
            eprintln!("warning: {}", line.as_ref());
        }
    }

    fn error(&self, line: impl AsRef<str>) {
        if self.colors_enabled {
            eprintln!("{} {}", style("error:").red().bold(), line.as_ref());
        } else {
            eprintln!("error: {}", line.as_ref());
        }
    }

    fn debug(&self, line: impl AsRef<str>) {
        if !self.verbose || self.quiet {
            return;
        }
        if self.colors_enabled {
            println!("{} {}", style("debug:").dim(), line.as_ref());
        } else {
            println!("debug: {}", line.as_ref());
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::General(e) => self.handle_general(e),
            AppEvent::Progress(_) => {}
            AppEvent::Manifest(e) => self.handle_manifest(e),
            AppEvent::Resolve(e) => self.handle_resolve(e),
            AppEvent::Registry(e) => self.handle_registry(e),
            AppEvent::Emit(e) => self.handle_emit(e),
            AppEvent::Configure(e) => self.handle_configure(e),
            AppEvent::Build(e) => self.handle_build(e),
            AppEvent::Test(e) => self.handle_test(e),
            AppEvent::Workspace(e) => self.handle_workspace(e),
            AppEvent::Analyzer(e) => self.handle_analyzer(e),
        }
    }

    fn handle_general(&self, event: GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, .. } => self.warn(message),
            GeneralEvent::Error { message, .. } => self.error(message),
            GeneralEvent::DebugLog { message, .. } => self.debug(message),
            GeneralEvent::OperationStarted { operation } => self.debug(format!("{operation} started")),
            GeneralEvent::OperationCompleted { operation, success } => {
                self.debug(format!("{operation} completed (success={success})"));
            }
            GeneralEvent::OperationFailed { operation, failure } => {
                self.error(format!("{operation} failed: {}", failure.message));
            }
        }
    }

    fn handle_manifest(&self, event: ManifestEvent) {
        match event {
            ManifestEvent::LoadStarted { path } => self.debug(format!("loading manifest {path}")),
            ManifestEvent::LoadCompleted { name, warnings, .. } => {
                self.debug(format!("loaded manifest for {name}"));
                for warning in warnings {
                    self.warn(warning);
                }
            }
            ManifestEvent::LoadFailed { path, failure } => {
                self.error(format!("failed to load {path}: {}", failure.message));
            }
            ManifestEvent::Diagnostic { message, .. } => self.warn(message),
        }
    }

    fn handle_resolve(&self, event: ResolveEvent) {
        match event {
            ResolveEvent::Started { project, count } => {
                self.ok(format!("resolving {count} dependencies for {project}"));
            }
            ResolveEvent::DependencyStarted { name, .. } => {
                self.debug(format!("resolving {name}"));
            }
            ResolveEvent::DependencyProgress { name, message } => {
                self.debug(format!("{name}: {message}"));
            }
            ResolveEvent::VersionSelected { name, resolved, .. } => {
                self.info(format!("  {name} -> {resolved}"));
            }
            ResolveEvent::DependencyCompleted { name, .. } => {
                self.debug(format!("{name} resolved"));
            }
            ResolveEvent::DependencyUpToDate { name } => {
                self.debug(format!("{name} up to date"));
            }
            ResolveEvent::DependencyFailed { name, failure } => {
                self.error(format!("{name}: {}", failure.message));
            }
            ResolveEvent::LockVerifyStarted { project } => {
                self.ok(format!("verifying lock file for {project}"));
            }
            ResolveEvent::LockVerifyMismatch { name, expected, actual } => {
                self.error(format!("{name}: expected {expected}, found {actual}"));
            }
            ResolveEvent::LockVerifyPassed { project } => {
                self.ok(format!("{project}: lock file verified"));
            }
            ResolveEvent::LockFileWritten { entries, .. } => {
                self.debug(format!("lock file written ({entries} entries)"));
            }
            ResolveEvent::Completed { project, duration } => {
                self.ok(format!("{project}: dependencies resolved in {duration:.2?}"));
            }
            ResolveEvent::Failed { project, failure } => {
                self.error(format!("{project}: resolution failed: {}", failure.message));
            }
        }
    }

    fn handle_registry(&self, event: RegistryEvent) {
        match event {
            RegistryEvent::LookupStarted { name } => self.debug(format!("registry: looking up {name}")),
            RegistryEvent::ServedFromCache { name, age_days } => {
                self.debug(format!("registry: {name} served from cache ({age_days}d old)"));
            }
            RegistryEvent::RefreshStarted { index_url } => {
                self.debug(format!("registry: refreshing from {index_url}"));
            }
            RegistryEvent::RefreshCompleted { package_count, .. } => {
                self.debug(format!("registry: {package_count} packages cached"));
            }
            RegistryEvent::RefreshFailed { failure, .. } => {
                self.warn(format!("registry refresh failed: {}", failure.message));
            }
            RegistryEvent::EntryMissing { name } => self.error(format!("registry: no entry for {name}")),
        }
    }

    fn handle_emit(&self, event: EmitEvent) {
        match event {
            EmitEvent::SkippedUpToDate { .. } => self.debug("CMakeLists.txt up to date"),
            EmitEvent::Started { .. } => self.debug("rendering CMakeLists.txt"),
            EmitEvent::Written { path, bytes, .. } => {
                self.ok(format!("wrote {path} ({bytes} bytes)"));
            }
            EmitEvent::Failed { failure, .. } => self.error(format!("emit failed: {}", failure.message)),
        }
    }

    fn handle_configure(&self, event: ConfigureEvent) {
        match event {
            ConfigureEvent::Started { project, generator, build_config } => {
                self.ok(format!("configuring {project} ({build_config}, {generator:?})"));
            }
            ConfigureEvent::OutputLine { line, .. } => self.debug(line),
            ConfigureEvent::Completed { project, duration } => {
                self.ok(format!("{project} configured in {duration:.2?}"));
            }
            ConfigureEvent::Failed { project, failure } => {
                self.error(format!("{project} configure failed: {}", failure.message));
            }
        }
    }

    fn handle_build(&self, event: BuildEvent) {
        match event {
            BuildEvent::Started { project, build_config, jobs } => {
                self.ok(format!("building {project} ({build_config}, -j{jobs})"));
            }
            BuildEvent::Progress { fraction, current_file, .. } => {
                if let Some(file) = current_file {
                    self.debug(format!("[{:>3.0}%] {file}", fraction * 100.0));
                }
            }
            BuildEvent::OutputLine { line, .. } => self.debug(line),
            BuildEvent::FileCompiled { file, duration, .. } => {
                self.debug(format!("{file} compiled in {duration:.2?}"));
            }
            BuildEvent::Completed { project, duration, slowest_files } => {
                self.ok(format!("{project} built in {duration:.2?}"));
                if self.verbose {
                    for (file, elapsed) in slowest_files.iter().take(5) {
                        self.debug(format!("  {elapsed:.2?} {file}"));
                    }
                }
            }
            BuildEvent::Failed { project, failure } => {
                self.error(format!("{project} build failed: {}", failure.message));
            }
        }
    }

    fn handle_test(&self, event: TestEvent) {
        match event {
            TestEvent::DiscoveryStarted { directory, .. } => {
                self.debug(format!("discovering targets under {directory}"));
            }
            TestEvent::DiscoveryCompleted { targets, .. } => {
                self.ok(format!("found {} target(s)", targets.len()));
            }
            TestEvent::TargetBuildStarted { target } => self.debug(format!("building {target}")),
            TestEvent::TargetBuildCompleted { .. } => {}
            TestEvent::TargetRunStarted { target, framework } => {
                self.info(format!("running {target} ({framework})"));
            }
            TestEvent::CaseResult { name, status, duration, message, .. } => {
                let marker = match status {
                    TestStatus::Passed => if self.colors_enabled { style("PASS").green().to_string() } else { "PASS".to_string() },
                    TestStatus::Failed => if self.colors_enabled { style("FAIL").red().to_string() } else { "FAIL".to_string() },
                    TestStatus::Skipped => "SKIP".to_string(),
                    TestStatus::Timeout => "TIMEOUT".to_string(),
                };
                self.info(format!("  [{marker}] {name} ({duration:.2?})"));
                if let Some(message) = message {
                    if status == TestStatus::Failed {
                        self.info(format!("    {message}"));
                    }
                }
            }
            TestEvent::TargetTimeout { target, seconds } => {
                self.error(format!("{target} timed out after {seconds}s"));
            }
            TestEvent::TargetRunCompleted { .. } => {}
            TestEvent::Summary { passed, failed, skipped, timed_out, duration, .. } => {
                self.ok(format!(
                    "{passed} passed, {failed} failed, {skipped} skipped, {timed_out} timed out in {duration:.2?}"
                ));
            }
            TestEvent::TargetFailed { target, failure } => {
                self.error(format!("{target}: {}", failure.message));
            }
        }
    }

    fn handle_workspace(&self, event: WorkspaceEvent) {
        match event {
            WorkspaceEvent::Loaded { name, members } => {
                self.ok(format!("workspace {name}: {} member(s)", members.len()));
            }
            WorkspaceEvent::BuildOrderComputed { order, .. } => {
                self.debug(format!("build order: {}", order.join(" -> ")));
            }
            WorkspaceEvent::CycleDetected { chain, .. } => {
                self.error(format!("dependency cycle: {}", chain.join(" -> ")));
            }
            WorkspaceEvent::MemberStarted { member, index, total } => {
                self.ok(format!("[{}/{total}] {member}", index + 1));
            }
            WorkspaceEvent::MemberCompleted { member, duration } => {
                self.ok(format!("{member} done in {duration:.2?}"));
            }
            WorkspaceEvent::MemberFailed { member, failure } => {
                self.error(format!("{member} failed: {}", failure.message));
            }
            WorkspaceEvent::MemberSkipped { member, because_of } => {
                self.warn(format!("{member} skipped (blocked by {because_of})"));
            }
            WorkspaceEvent::Completed { succeeded, failed, skipped, .. } => {
                self.ok(format!("{succeeded} succeeded, {failed} failed, {skipped} skipped"));
            }
            WorkspaceEvent::RunningStartupMember { member } => {
                self.ok(format!("running {member}"));
            }
        }
    }

    fn handle_analyzer(&self, event: AnalyzerEvent) {
        match event {
            AnalyzerEvent::ScanStarted { file_count, .. } => {
                self.debug(format!("scanning {file_count} file(s)"));
            }
            AnalyzerEvent::CycleFound { chain } => {
                self.warn(format!("cycle: {}", chain.join(" -> ")));
            }
            AnalyzerEvent::Completed { total_chains, .. } => {
                if total_chains == 0 {
                    self.ok("no include cycles found");
                } else {
                    self.error(format!("{total_chains} include cycle(s) found"));
                }
            }
        }
    }
}
