//! `subdirectory` dependency handling: verify the path exists and contains
//! a `CMakeLists.txt`; no fetching (§4.5).

use cforge_errors::{Error, ResolverError};
use cforge_types::{CmakeBinding, DependencySourceKind, ResolvedDependency};
use std::collections::BTreeMap;
use std::path::Path;

pub async fn resolve(
    project_root: &Path,
    name: &str,
    path: &str,
    target: &str,
    options: &BTreeMap<String, String>,
) -> Result<ResolvedDependency, Error> {
    let dep_path = project_root.join(path);
    if !dep_path.exists() {
        return Err(ResolverError::SubdirectoryMissing {
            name: name.to_string(),
            path: dep_path.display().to_string(),
        }
        .into());
    }
    if !dep_path.join("CMakeLists.txt").exists() {
        return Err(ResolverError::SubdirectoryNotCMake {
            name: name.to_string(),
            path: dep_path.display().to_string(),
        }
        .into());
    }

    Ok(ResolvedDependency {
        name: name.to_string(),
        source: DependencySourceKind::Subdirectory,
        resolved_version: None,
        path: Some(dep_path.clone()),
        content_hash: None,
        binding: CmakeBinding {
            link_target: Some(target.to_string()),
            cmake_options: options.clone(),
            add_subdirectory_path: Some(dep_path.display().to_string()),
            ..Default::default()
        },
    })
}
