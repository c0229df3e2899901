use serde::{Deserialize, Serialize};

/// Structured error payload threaded through failure-shaped event variants,
/// mirroring [`cforge_errors::Error`]'s `{ kind, message, path }` shape so
/// events never have to carry a non-`Clone` error type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Short machine-stable kind, e.g. `"fetch_failed"`, `"configure_failed"`.
    pub kind: String,
    /// Human-readable message suitable for direct display.
    pub message: String,
    /// Path implicated in the failure, if any.
    pub path: Option<String>,
}

impl FailureContext {
    #[must_use]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            path: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl From<&cforge_errors::Error> for FailureContext {
    fn from(err: &cforge_errors::Error) -> Self {
        Self::new("error", err.to_string())
    }
}
