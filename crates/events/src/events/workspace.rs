use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Workspace Orchestrator events (component J).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkspaceEvent {
    /// Workspace manifest loaded; members enumerated.
    Loaded { name: String, members: Vec<String> },

    /// Topological build order computed.
    BuildOrderComputed { name: String, order: Vec<String> },

    /// A dependency cycle was detected among members; the orchestrator
    /// aborts without invoking CMake.
    CycleDetected { name: String, chain: Vec<String> },

    /// A single member's pipeline (resolve → emit → configure → build)
    /// began.
    MemberStarted { member: String, index: usize, total: usize },

    /// A single member's pipeline completed successfully.
    MemberCompleted { member: String, duration: Duration },

    /// A single member's pipeline failed.
    MemberFailed {
        member: String,
        failure: super::FailureContext,
    },

    /// Under `--keep-going`, a member was skipped because its dependency
    /// closure includes a member that already failed.
    MemberSkipped { member: String, because_of: String },

    /// The whole workspace build finished.
    Completed {
        name: String,
        succeeded: usize,
        failed: usize,
        skipped: usize,
    },

    /// The `run` command is about to invoke the startup member's
    /// executable.
    RunningStartupMember { member: String },
}
