//! Integration tests for cforge-types

use cforge_types::{
    BuildOverlay, Compiler, Dependency, GitRefSpec, OutputKind, Platform, PortableOptions,
    ProjectManifest, WarningLevel,
};

fn overlay(defines: &[&str]) -> BuildOverlay {
    BuildOverlay {
        defines: defines.iter().map(|s| (*s).to_string()).collect(),
        ..BuildOverlay::default()
    }
}

#[test]
fn overlay_merge_preserves_order_and_dedups() {
    let base = overlay(&["A", "SHARED"]);
    let platform = overlay(&["B", "SHARED"]);
    let merged = base.merged_with(&platform);
    assert_eq!(merged.defines, vec!["A", "SHARED", "B"]);
}

#[test]
fn portable_options_scalar_override_and_list_concat() {
    let mut base = PortableOptions::default();
    base.warnings = Some(WarningLevel::Default);
    base.sanitizers = vec![cforge_types::Sanitizer::Address];

    let mut over = PortableOptions::default();
    over.sanitizers = vec![cforge_types::Sanitizer::Undefined];

    let merged = base.merged_with(&over);
    assert_eq!(merged.warnings, Some(WarningLevel::Default));
    assert_eq!(
        merged.sanitizers,
        vec![cforge_types::Sanitizer::Address, cforge_types::Sanitizer::Undefined]
    );
}

#[test]
fn empty_overlay_is_identity() {
    let base = overlay(&["A"]);
    let merged = base.merged_with(&BuildOverlay::default());
    assert_eq!(merged.defines, base.defines);
}

#[test]
fn dependency_name_accessor_covers_all_kinds() {
    let git = Dependency::Git {
        name: "fmt".into(),
        url: "https://example/fmt.git".into(),
        git_ref: GitRefSpec::default(),
        shallow: true,
        include: true,
        link: true,
        target: Some("fmt::fmt".into()),
    };
    assert_eq!(git.name(), "fmt");
}

#[test]
fn git_ref_precedence_commit_over_tag_over_branch() {
    let spec = GitRefSpec {
        commit: Some("deadbeef".into()),
        tag: Some("v1.0.0".into()),
        branch: Some("main".into()),
    };
    assert_eq!(
        spec.resolve(),
        Some(cforge_types::GitRef::Commit("deadbeef".into()))
    );

    let tag_only = GitRefSpec {
        commit: None,
        tag: Some("v1.0.0".into()),
        branch: Some("main".into()),
    };
    assert_eq!(
        tag_only.resolve(),
        Some(cforge_types::GitRef::Tag("v1.0.0".into()))
    );
}

#[test]
fn manifest_round_trips_through_toml() {
    let manifest = ProjectManifest {
        name: "app".into(),
        version: "0.2.1".into(),
        description: None,
        authors: vec![],
        license: None,
        output_kind: OutputKind::Executable,
        c_standard: None,
        cpp_standard: Some("20".into()),
        sources: vec!["src/**/*.cpp".into()],
        includes: vec!["include".into()],
        base: BuildOverlay::default(),
        platform_overlays: std::collections::BTreeMap::new(),
        compiler_overlays: std::collections::BTreeMap::new(),
        platform_compiler_overlays: std::collections::BTreeMap::new(),
        build_config_overlays: std::collections::BTreeMap::new(),
        build_configs_overlays_deprecated: std::collections::BTreeMap::new(),
        dependencies: vec![],
        precompiled_headers: vec![],
        module_paths: vec![],
        cmake_includes: vec![],
        inject_before_target: None,
        inject_after_target: None,
        packaging: None,
        dependencies_directory: "deps".into(),
        workspace: None,
    };

    let toml_str = toml::to_string(&manifest).unwrap();
    let roundtripped: ProjectManifest = toml::from_str(&toml_str).unwrap();
    assert_eq!(roundtripped.name, "app");
    assert_eq!(roundtripped.languages(), vec!["CXX"]);
}

#[test]
fn platform_parse_is_case_insensitive_and_falls_back_to_unknown() {
    assert_eq!(Platform::parse("LINUX"), Platform::Linux);
    assert_eq!(Platform::parse("Darwin"), Platform::MacOs);
    assert_eq!(Platform::parse("plan9"), Platform::Unknown);
}

#[test]
fn compiler_is_msvc_style() {
    assert!(Compiler::Msvc.is_msvc_style());
    assert!(!Compiler::Gcc.is_msvc_style());
}
