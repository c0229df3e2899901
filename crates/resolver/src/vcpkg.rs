//! `vcpkg` dependency handling: no materialization, resolves the active
//! triplet and records it for the emitter (§4.5).

use cforge_errors::{Error, ResolverError};
use cforge_types::{CmakeBinding, DependencySourceKind, ResolvedDependency};

/// Host-default triplet used when the dependency doesn't pin one
/// explicitly.
#[must_use]
pub fn default_triplet() -> &'static str {
    if cfg!(target_os = "windows") {
        "x64-windows"
    } else if cfg!(target_os = "macos") {
        "x64-osx"
    } else {
        "x64-linux"
    }
}

/// Resolve a `vcpkg` dependency against `VCPKG_ROOT`.
///
/// # Errors
/// Returns [`ResolverError::VcpkgRootMissing`] if the environment variable
/// isn't set.
pub fn resolve(
    name: &str,
    package: &str,
    triplet: Option<&str>,
    vcpkg_root: Option<&str>,
) -> Result<ResolvedDependency, Error> {
    let root = vcpkg_root.ok_or_else(|| ResolverError::VcpkgRootMissing {
        name: name.to_string(),
    })?;
    let triplet = triplet.unwrap_or_else(default_triplet).to_string();

    let mut options = std::collections::BTreeMap::new();
    options.insert("package".to_string(), package.to_string());
    options.insert("vcpkg_root".to_string(), root.to_string());

    Ok(ResolvedDependency {
        name: name.to_string(),
        source: DependencySourceKind::Vcpkg,
        resolved_version: None,
        path: None,
        content_hash: None,
        binding: CmakeBinding {
            cmake_options: options,
            vcpkg_triplet: Some(triplet),
            ..Default::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_errors() {
        let err = resolve("fmt", "fmt", None, None).unwrap_err();
        assert!(matches!(
            err,
            Error::Resolver(ResolverError::VcpkgRootMissing { .. })
        ));
    }

    #[test]
    fn explicit_triplet_wins_over_default() {
        let resolved = resolve("fmt", "fmt", Some("arm64-osx"), Some("/opt/vcpkg")).unwrap();
        assert_eq!(resolved.binding.vcpkg_triplet.as_deref(), Some("arm64-osx"));
    }
}
