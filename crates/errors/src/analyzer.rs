//! Include-graph analysis error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum AnalyzerError {
    #[error("project directory {path} does not exist")]
    ProjectDirMissing { path: String },

    #[error("failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },
}

impl UserFacingError for AnalyzerError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ProjectDirMissing { .. } => Some("Check the project path."),
            Self::ReadFailed { .. } => Some("Check file permissions and encoding."),
        }
    }
}
