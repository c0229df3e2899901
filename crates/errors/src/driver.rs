//! Build driver (process spawning, configure/build) error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum DriverError {
    #[error("no generator found (install ninja, or a platform default build system)")]
    NoGeneratorFound,

    #[error("configure failed (exit code {exit_code:?}):\n{output}")]
    ConfigureFailed {
        exit_code: Option<i32>,
        output: String,
    },

    #[error("build failed (exit code {exit_code:?}):\n{output}")]
    BuildFailed {
        exit_code: Option<i32>,
        output: String,
    },

    #[error("{program} timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },

    #[error("{program} was cancelled")]
    Cancelled { program: String },

    #[error("failed to spawn {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("no startup project specified and none marked as startup")]
    NoStartupTarget,
}

impl UserFacingError for DriverError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoGeneratorFound => {
                Some("Install CMake and either Ninja or your platform's default build tool.")
            }
            Self::ConfigureFailed { .. } | Self::BuildFailed { .. } => {
                Some("Inspect the captured output above for the underlying compiler/CMake error.")
            }
            Self::Timeout { .. } => Some("Increase the configured timeout or investigate a hang."),
            Self::Cancelled { .. } => None,
            Self::SpawnFailed { .. } => {
                Some("Check that the program is installed and present on PATH.")
            }
            Self::NoStartupTarget => Some("Pass --project or set `startup` in the workspace."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
