//! Per-dependency on-disk lock sentinel: at most one concurrent
//! materialization per dependency name within a single invocation (§5).

use cforge_errors::{Error, ResolverError};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Holds an exclusively-created sentinel file for the lifetime of a
/// dependency's materialization; removed on drop (best-effort).
pub struct MaterializationGuard {
    path: PathBuf,
}

impl MaterializationGuard {
    /// Acquire the sentinel for `name` inside `deps_dir`, failing if another
    /// materialization for the same name is already in flight.
    ///
    /// # Errors
    /// Returns [`ResolverError::FetchFailed`] if the sentinel already exists.
    pub fn acquire(deps_dir: &Path, name: &str) -> Result<Self, Error> {
        std::fs::create_dir_all(deps_dir).map_err(|e| ResolverError::FetchFailed {
            name: name.to_string(),
            message: format!("failed to create dependencies directory: {e}"),
        })?;
        let path = deps_dir.join(format!(".{name}.lock"));
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|_| ResolverError::FetchFailed {
                name: name.to_string(),
                message: "another materialization for this dependency is already in progress"
                    .to_string(),
            })?;
        Ok(Self { path })
    }
}

impl Drop for MaterializationGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_first_is_held() {
        let dir = tempfile::tempdir().unwrap();
        let guard = MaterializationGuard::acquire(dir.path(), "fmt").unwrap();
        let err = MaterializationGuard::acquire(dir.path(), "fmt").unwrap_err();
        assert!(matches!(
            err,
            Error::Resolver(ResolverError::FetchFailed { .. })
        ));
        drop(guard);
        assert!(MaterializationGuard::acquire(dir.path(), "fmt").is_ok());
    }
}
