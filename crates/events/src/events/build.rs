use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Build-phase events (component L, second half: `cmake --build`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuildEvent {
    /// Build invocation started.
    Started {
        project: String,
        build_config: String,
        jobs: usize,
    },

    /// Progress recognized from a generator-specific progress line
    /// (Ninja `[N/M]`, Make `[NN%]`, MSBuild), normalized to 0.0..=1.0.
    Progress {
        project: String,
        fraction: f64,
        current_file: Option<String>,
    },

    /// One line of captured stdout/stderr from the build step, emitted
    /// when no progress line was recognized.
    OutputLine { project: String, line: String },

    /// A single source file finished compiling, with elapsed time, for the
    /// "slowest files" report.
    FileCompiled {
        project: String,
        file: String,
        duration: Duration,
    },

    /// Build completed successfully.
    Completed {
        project: String,
        duration: Duration,
        slowest_files: Vec<(String, Duration)>,
    },

    /// Build exited nonzero.
    Failed {
        project: String,
        failure: super::FailureContext,
    },
}
