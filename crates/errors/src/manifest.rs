//! Manifest loading error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ManifestError {
    #[error("{file}: not found")]
    NotFound { file: String },

    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        /// Line number, or 0 when the underlying parser did not report one.
        line: u32,
        message: String,
    },

    #[error("{file}: {message}")]
    Schema { file: String, message: String },

    #[error("project name is empty")]
    EmptyName,

    #[error("invalid output kind {kind:?} (expected executable, static_lib, shared_lib, or header_only)")]
    InvalidOutputKind { kind: String },

    #[error("project declares neither a C nor a C++ standard")]
    NoLanguageStandard,

    #[error("duplicate dependency name: {name}")]
    DuplicateDependency { name: String },

    #[error("both cforge.toml with [workspace] and a legacy cforge.workspace.toml are present; using cforge.toml")]
    LegacyWorkspaceFileIgnored,

    #[error("workspace member {member} is missing a cforge.toml")]
    MemberManifestMissing { member: String },
}

impl UserFacingError for ManifestError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Run `cforge init` to create a cforge.toml."),
            Self::Parse { .. } | Self::Schema { .. } => {
                Some("Fix the TOML syntax or field named in the error and retry.")
            }
            Self::EmptyName => Some("Add a non-empty `name` field to the manifest."),
            Self::InvalidOutputKind { .. } => {
                Some("Use one of: executable, static_lib, shared_lib, header_only.")
            }
            Self::NoLanguageStandard => {
                Some("Declare `c_standard` and/or `cpp_standard` in the manifest.")
            }
            Self::DuplicateDependency { .. } => {
                Some("Remove or rename the duplicate dependency entry.")
            }
            Self::MemberManifestMissing { .. } => {
                Some("Create a cforge.toml in the member directory or remove it from the workspace.")
            }
            Self::LegacyWorkspaceFileIgnored => None,
        }
    }
}
