//! Workspace orchestration error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum WorkspaceError {
    #[error("workspace manifest not found at {path}")]
    NotFound { path: String },

    #[error("workspace member {member} does not exist at {path}")]
    MemberMissing { member: String, path: String },

    #[error("workspace member {name} is declared more than once")]
    DuplicateMember { name: String },

    #[error("cycle detected in workspace dependency graph: {chain}")]
    CycleDetected { chain: String },

    #[error("unknown workspace dependency {dependency} referenced by {member}")]
    UnknownDependency { member: String, dependency: String },

    #[error("no startup project is configured for this workspace")]
    NoStartupProject,

    #[error("unknown project {name} requested with --project")]
    UnknownProject { name: String },

    #[error("build of member {member} failed")]
    MemberBuildFailed { member: String },
}

impl UserFacingError for WorkspaceError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => {
                Some("Add a [workspace] section to cforge.toml or a members list.")
            }
            Self::MemberMissing { .. } => {
                Some("Check the member path in the workspace manifest.")
            }
            Self::DuplicateMember { .. } => Some("Remove the duplicate member entry."),
            Self::CycleDetected { .. } => {
                Some("Break the cycle named in the error by removing one dependency edge.")
            }
            Self::UnknownDependency { .. } => {
                Some("Add the missing member to the workspace or fix the dependency name.")
            }
            Self::NoStartupProject => {
                Some("Set `startup` on a member or pass --project explicitly.")
            }
            Self::UnknownProject { .. } => Some("Check the project name passed to --project."),
            Self::MemberBuildFailed { .. } => {
                Some("Rerun with --keep-going to continue building independent members.")
            }
        }
    }
}
