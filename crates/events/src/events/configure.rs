use serde::{Deserialize, Serialize};
use std::time::Duration;

/// CMake generator selected by the Build Driver (§4.12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generator {
    NinjaMultiConfig,
    UnixMakefiles,
    VisualStudio,
}

/// CMake configure-phase events (component L, first half).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConfigureEvent {
    /// Configure invocation started.
    Started {
        project: String,
        generator: Generator,
        build_config: String,
    },

    /// One line of captured stdout/stderr from the configure step.
    OutputLine { project: String, line: String },

    /// Configure completed successfully.
    Completed { project: String, duration: Duration },

    /// Configure exited nonzero.
    Failed {
        project: String,
        failure: super::FailureContext,
    },
}
