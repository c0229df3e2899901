//! Test/benchmark runner error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RunnerError {
    #[error("no test/benchmark targets discovered under {path}")]
    NoTargetsFound { path: String },

    #[error("target {name} failed: {passed}/{total} passed")]
    TestsFailed {
        name: String,
        passed: usize,
        total: usize,
    },

    #[error("target {name} timed out after {seconds}s")]
    Timeout { name: String, seconds: u64 },

    #[error("unrecognized test framework output for target {name}")]
    UnrecognizedOutput { name: String },
}

impl UserFacingError for RunnerError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoTargetsFound { .. } => {
                Some("Add a tests/ or bench/ directory with discoverable targets.")
            }
            Self::TestsFailed { .. } => Some("Inspect the failing test's captured stdio."),
            Self::Timeout { .. } => Some("Increase the per-target timeout or investigate a hang."),
            Self::UnrecognizedOutput { .. } => {
                Some("Declare the test framework explicitly in the manifest.")
            }
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
