//! Version and constraint parsing error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum VersionError {
    #[error("invalid version: {input}")]
    InvalidVersion { input: String },

    #[error("invalid version constraint: {input}")]
    InvalidConstraint { input: String },

    #[error("no version satisfies constraint: {constraint}")]
    NoSatisfyingVersion { constraint: String },
}

impl UserFacingError for VersionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidVersion { .. } => {
                Some("Use a semantic-version string like 1.2.3 or v1.2.3.")
            }
            Self::InvalidConstraint { .. } => {
                Some("Use a constraint like \"^1.2\", \"~1.2.3\", \">=1.0,<2.0\", or \"*\".")
            }
            Self::NoSatisfyingVersion { .. } => {
                Some("Relax the version constraint or check the registry for available versions.")
            }
        }
    }
}
