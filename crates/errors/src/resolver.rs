//! Dependency resolution error types

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ResolverError {
    #[error("failed to fetch dependency {name}: {message}")]
    FetchFailed { name: String, message: String },

    #[error("no version of {name} satisfies constraint {constraint}")]
    NoMatchingVersion { name: String, constraint: String },

    #[error("registry entry missing for dependency {name}")]
    RegistryEntryMissing { name: String },

    #[error("lock verification failed for {name}: expected {expected}, found {actual}")]
    LockVerificationFailed {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("subdirectory dependency {name} does not exist at {path}")]
    SubdirectoryMissing { name: String, path: String },

    #[error("subdirectory dependency {name} at {path} has no CMakeLists.txt")]
    SubdirectoryNotCMake { name: String, path: String },

    #[error("cycle detected among subdirectory dependencies: {chain}")]
    CycleInSubdirectoryDeps { chain: String },

    #[error("duplicate dependency name: {name}")]
    DuplicateDependency { name: String },

    #[error("dependency {name} requires VCPKG_ROOT to be set")]
    VcpkgRootMissing { name: String },

    #[error("failed to read/write lock file {path}: {message}")]
    LockFileIo { path: String, message: String },
}

impl UserFacingError for ResolverError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::FetchFailed { .. } => {
                Some("Check network connectivity and that the repository URL/ref are correct.")
            }
            Self::NoMatchingVersion { .. } => {
                Some("Relax the version constraint or check the registry for available versions.")
            }
            Self::RegistryEntryMissing { .. } => {
                Some("Check the package name, or switch to a git/subdirectory dependency.")
            }
            Self::LockVerificationFailed { .. } => {
                Some("Run `cforge lock --force` to re-resolve and rewrite the lock file.")
            }
            Self::SubdirectoryMissing { .. } | Self::SubdirectoryNotCMake { .. } => {
                Some("Check the `path` field of the subdirectory dependency.")
            }
            Self::CycleInSubdirectoryDeps { .. } => {
                Some("Break the cycle named in the error by removing one of the dependency edges.")
            }
            Self::DuplicateDependency { .. } => {
                Some("Remove or rename the duplicate dependency entry in the manifest.")
            }
            Self::VcpkgRootMissing { .. } => {
                Some("Set the VCPKG_ROOT environment variable to your vcpkg installation.")
            }
            Self::LockFileIo { .. } => Some("Ensure the project directory is writable."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }
}
