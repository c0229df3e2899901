use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a dependency is sourced, mirrored here so events don't need to
/// depend on `cforge-types` for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencySource {
    Git,
    Registry,
    Subdirectory,
    System,
    Vcpkg,
}

/// Dependency Resolver events (component E, plus F/G collaborators).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResolveEvent {
    /// Resolution of the full dependency set for a project began.
    Started { project: String, count: usize },

    /// A single dependency's materialization began.
    DependencyStarted {
        name: String,
        source: DependencySource,
    },

    /// A single dependency resolved to a concrete version/commit.
    VersionSelected {
        name: String,
        constraint: String,
        resolved: String,
    },

    /// Materialization progress for a single dependency (clone/fetch).
    DependencyProgress {
        name: String,
        message: String,
    },

    /// A dependency materialized and was bound into the lock file.
    DependencyCompleted {
        name: String,
        source: DependencySource,
        duration: Duration,
    },

    /// A dependency's on-disk materialization already satisfies the lock
    /// entry; no work was done.
    DependencyUpToDate { name: String },

    /// A single dependency failed to resolve.
    DependencyFailed {
        name: String,
        failure: super::FailureContext,
    },

    /// Lock file verification started (`lock --verify`).
    LockVerifyStarted { project: String },

    /// Lock file verification found a mismatch.
    LockVerifyMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Lock file verification passed for every entry.
    LockVerifyPassed { project: String },

    /// Lock file was rewritten after resolution.
    LockFileWritten { path: String, entries: usize },

    /// The whole dependency set resolved successfully.
    Completed {
        project: String,
        duration: Duration,
    },

    /// Resolution aborted (one or more dependencies failed).
    Failed { project: String, failure: super::FailureContext },
}
