use serde::{Deserialize, Serialize};

// Declare all domain modules
pub mod analyzer;
pub mod build;
pub mod configure;
pub mod emit;
pub mod failure;
pub mod general;
pub mod manifest;
pub mod progress;
pub mod registry;
pub mod resolve;
pub mod test;
pub mod workspace;

// Re-export all domain events
pub use analyzer::*;
pub use build::*;
pub use configure::*;
pub use emit::*;
pub use failure::*;
pub use general::*;
pub use manifest::*;
pub use progress::*;
pub use registry::*;
pub use resolve::*;
pub use test::*;
pub use workspace::*;

/// Top-level application event enum that aggregates all domain-specific
/// events. One variant per domain occurrence, mirroring the pipeline's own
/// stages (Manifest Loader
/// → Configuration Resolver → Dependency Resolver → CMake Emitter → Build
/// Driver), plus the cross-cutting `General`/`Progress` events and the
/// Workspace Orchestrator's own events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations).
    General(GeneralEvent),

    /// Progress tracking events (sophisticated progress algorithms).
    Progress(ProgressEvent),

    /// Manifest Loader events (component A).
    Manifest(ManifestEvent),

    /// Dependency Resolver events (component E).
    Resolve(ResolveEvent),

    /// Registry Client events (component F).
    Registry(RegistryEvent),

    /// CMake Emitter events (component I).
    Emit(EmitEvent),

    /// CMake configure-phase events (component L, first half).
    Configure(ConfigureEvent),

    /// CMake build-phase events (component L, second half).
    Build(BuildEvent),

    /// Test/Benchmark Runner events (component M).
    Test(TestEvent),

    /// Workspace Orchestrator events (component J).
    Workspace(WorkspaceEvent),

    /// Include-Graph Analyzer events (component K).
    Analyzer(AnalyzerEvent),
}

impl AppEvent {
    /// Determine the appropriate tracing log level for this event.
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            AppEvent::General(GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. }) => {
                Level::ERROR
            }
            AppEvent::Manifest(ManifestEvent::LoadFailed { .. }) => Level::ERROR,
            AppEvent::Resolve(
                ResolveEvent::DependencyFailed { .. } | ResolveEvent::Failed { .. },
            ) => Level::ERROR,
            AppEvent::Registry(RegistryEvent::RefreshFailed { .. }) => Level::WARN,
            AppEvent::Emit(EmitEvent::Failed { .. }) => Level::ERROR,
            AppEvent::Configure(ConfigureEvent::Failed { .. }) => Level::ERROR,
            AppEvent::Build(BuildEvent::Failed { .. }) => Level::ERROR,
            AppEvent::Test(TestEvent::TargetFailed { .. }) => Level::ERROR,
            AppEvent::Workspace(
                WorkspaceEvent::CycleDetected { .. } | WorkspaceEvent::MemberFailed { .. },
            ) => Level::ERROR,
            AppEvent::Progress(ProgressEvent::Failed { .. }) => Level::ERROR,

            AppEvent::General(GeneralEvent::Warning { .. }) => Level::WARN,
            AppEvent::Resolve(ResolveEvent::LockVerifyMismatch { .. }) => Level::WARN,
            AppEvent::Workspace(WorkspaceEvent::MemberSkipped { .. }) => Level::WARN,
            AppEvent::Progress(
                ProgressEvent::Paused { .. },
            ) => Level::WARN,

            AppEvent::Manifest(ManifestEvent::LoadCompleted { .. }) => Level::INFO,
            AppEvent::Resolve(ResolveEvent::Completed { .. }) => Level::INFO,
            AppEvent::Emit(EmitEvent::Written { .. }) => Level::INFO,
            AppEvent::Configure(ConfigureEvent::Completed { .. }) => Level::INFO,
            AppEvent::Build(BuildEvent::Completed { .. }) => Level::INFO,
            AppEvent::Test(TestEvent::Summary { .. }) => Level::INFO,
            AppEvent::Workspace(WorkspaceEvent::Completed { .. }) => Level::INFO,
            AppEvent::Progress(ProgressEvent::Completed { .. }) => Level::INFO,

            AppEvent::Build(BuildEvent::OutputLine { .. } | BuildEvent::Progress { .. }) => {
                Level::DEBUG
            }
            AppEvent::Configure(ConfigureEvent::OutputLine { .. }) => Level::DEBUG,
            AppEvent::General(GeneralEvent::DebugLog { .. }) => Level::DEBUG,
            AppEvent::Progress(ProgressEvent::Updated { .. }) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Log target (module path) for structured logging.
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            AppEvent::General(_) => "cforge::events::general",
            AppEvent::Progress(_) => "cforge::events::progress",
            AppEvent::Manifest(_) => "cforge::events::manifest",
            AppEvent::Resolve(_) => "cforge::events::resolve",
            AppEvent::Registry(_) => "cforge::events::registry",
            AppEvent::Emit(_) => "cforge::events::emit",
            AppEvent::Configure(_) => "cforge::events::configure",
            AppEvent::Build(_) => "cforge::events::build",
            AppEvent::Test(_) => "cforge::events::test",
            AppEvent::Workspace(_) => "cforge::events::workspace",
            AppEvent::Analyzer(_) => "cforge::events::analyzer",
        }
    }
}
