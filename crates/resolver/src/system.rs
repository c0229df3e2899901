//! `system` dependency handling: no materialization, only a `CmakeBinding`
//! describing how the emitter should look the package up (§4.5).

use cforge_types::{
    manifest::SystemDependencyKind, CmakeBinding, DependencySourceKind, ResolvedDependency,
};

pub fn resolve(
    name: &str,
    kind: SystemDependencyKind,
    components: &[String],
    target: Option<&str>,
    include_dirs: &[String],
    lib_dirs: &[String],
    libraries: &[String],
    defines: &[String],
) -> ResolvedDependency {
    let mut options = std::collections::BTreeMap::new();
    options.insert(
        "lookup_kind".to_string(),
        match kind {
            SystemDependencyKind::FindPackage => "find_package".to_string(),
            SystemDependencyKind::PkgConfig => "pkg_config".to_string(),
            SystemDependencyKind::Manual => "manual".to_string(),
        },
    );
    if !components.is_empty() {
        options.insert("components".to_string(), components.join(";"));
    }
    if !lib_dirs.is_empty() {
        options.insert("lib_dirs".to_string(), lib_dirs.join(";"));
    }
    if !libraries.is_empty() {
        options.insert("libraries".to_string(), libraries.join(";"));
    }
    if !defines.is_empty() {
        options.insert("defines".to_string(), defines.join(";"));
    }

    ResolvedDependency {
        name: name.to_string(),
        source: DependencySourceKind::System,
        resolved_version: None,
        path: None,
        content_hash: None,
        binding: CmakeBinding {
            include_dirs: include_dirs.to_vec(),
            link_target: target.map(str::to_string),
            cmake_options: options,
            fetch_content_url: None,
            fetch_content_tag: None,
            add_subdirectory_path: None,
            vcpkg_triplet: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_package_records_components() {
        let resolved = resolve(
            "OpenSSL",
            SystemDependencyKind::FindPackage,
            &["Crypto".to_string(), "SSL".to_string()],
            Some("OpenSSL::SSL"),
            &[],
            &[],
            &[],
            &[],
        );
        assert_eq!(
            resolved.binding.cmake_options.get("components"),
            Some(&"Crypto;SSL".to_string())
        );
        assert_eq!(resolved.binding.link_target.as_deref(), Some("OpenSSL::SSL"));
    }

    #[test]
    fn manual_records_libraries_and_defines() {
        let resolved = resolve(
            "m",
            SystemDependencyKind::Manual,
            &[],
            None,
            &[],
            &["/usr/lib".to_string()],
            &["m".to_string()],
            &["HAVE_LIBM".to_string()],
        );
        assert_eq!(
            resolved.binding.cmake_options.get("lookup_kind"),
            Some(&"manual".to_string())
        );
        assert_eq!(resolved.binding.cmake_options.get("libraries"), Some(&"m".to_string()));
    }
}
