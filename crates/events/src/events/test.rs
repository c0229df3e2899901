use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of a single test case (component M).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    Timeout,
}

/// Test/Benchmark Runner events (component M).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TestEvent {
    /// Discovery of test/bench targets under the configured directory began.
    DiscoveryStarted { project: String, directory: String },

    /// Discovery found the given targets.
    DiscoveryCompleted { project: String, targets: Vec<String> },

    /// A single target's binary build (via the Build Driver) began.
    TargetBuildStarted { target: String },

    /// A single target's binary build finished.
    TargetBuildCompleted { target: String, duration: Duration },

    /// A target's binary began executing.
    TargetRunStarted { target: String, framework: String },

    /// One individual test case result, parsed by a framework adapter.
    CaseResult {
        target: String,
        suite: Option<String>,
        name: String,
        status: TestStatus,
        duration: Duration,
        message: Option<String>,
    },

    /// A target's binary exceeded its timeout and was killed.
    TargetTimeout { target: String, seconds: u64 },

    /// A target finished executing; carries the aggregate summary for that
    /// target alone.
    TargetRunCompleted {
        target: String,
        passed: usize,
        failed: usize,
        skipped: usize,
        duration: Duration,
    },

    /// All discovered targets finished; carries the run-wide summary.
    Summary {
        project: String,
        passed: usize,
        failed: usize,
        skipped: usize,
        timed_out: usize,
        duration: Duration,
    },

    /// A target failed to build or crashed outright (not a normal test
    /// failure reported by the framework adapter).
    TargetFailed {
        target: String,
        failure: super::FailureContext,
    },
}
