//! Configuration Resolver (component C).
//!
//! A pure function of `(manifest, triple)` (§9): merges base, per-platform,
//! per-compiler, per-(platform,compiler), and per-build-config overlays
//! into one [`EffectiveConfig`], in the precedence order fixed by §3/§4.3.
//! List fields concatenate append-if-absent in precedence order; scalar
//! (portable) fields take the highest-precedence overlay that sets them.

use cforge_types::{BuildOverlay, Compiler, EffectiveConfig, Platform, ProjectManifest};

/// Resolve the effective configuration for one `(platform, compiler,
/// build_config)` triple. `build_config` is matched case-sensitively
/// against both the singular `[build.config.<cfg>]` and the deprecated
/// plural `[build.configs.<cfg>]` tables; on key conflict the singular form
/// wins (§4.3, §9 Open Question — see DESIGN.md).
#[must_use]
pub fn resolve(
    manifest: &ProjectManifest,
    platform: Platform,
    compiler: Compiler,
    build_config: &str,
) -> EffectiveConfig {
    let mut merged = manifest.base.clone();

    if let Some(overlay) = manifest.platform_overlays.get(&platform) {
        merged = merged.merged_with(overlay);
    }
    if let Some(overlay) = manifest.compiler_overlays.get(&compiler) {
        merged = merged.merged_with(overlay);
    }
    if let Some(overlay) = manifest
        .platform_compiler_overlays
        .get(&(platform, compiler))
    {
        merged = merged.merged_with(overlay);
    }

    let build_overlay = manifest
        .build_config_overlays
        .get(build_config)
        .or_else(|| manifest.build_configs_overlays_deprecated.get(build_config));
    if let Some(overlay) = build_overlay {
        merged = merged.merged_with(overlay);
    }

    // macOS frameworks are ignored on non-macOS platforms even if declared,
    // regardless of which overlay (base, platform, compiler, build-config)
    // introduced them (§4.3).
    merged = stripped_for_platform(&merged, platform);

    EffectiveConfig {
        platform,
        compiler,
        build_config: build_config.to_string(),
        defines: merged.defines,
        flags: merged.flags,
        links: merged.links,
        frameworks: merged.frameworks,
        cmake_args: merged.cmake_args,
        portable: merged.portable,
    }
}

/// macOS frameworks are ignored on non-macOS platforms even if declared
/// (§4.3).
fn stripped_for_platform(overlay: &BuildOverlay, platform: Platform) -> BuildOverlay {
    if platform == Platform::MacOs || overlay.frameworks.is_empty() {
        return overlay.clone();
    }
    BuildOverlay {
        frameworks: Vec::new(),
        ..overlay.clone()
    }
}

/// All build-config names declared anywhere in the manifest (singular
/// table preferred; plural names not already present via the singular
/// table are included too, since both are accepted — §4.3).
#[must_use]
pub fn declared_build_configs(manifest: &ProjectManifest) -> Vec<String> {
    let mut names: Vec<String> = manifest.build_config_overlays.keys().cloned().collect();
    for name in manifest.build_configs_overlays_deprecated.keys() {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    if names.is_empty() {
        names.push("Debug".to_string());
        names.push("Release".to_string());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use cforge_types::manifest::OutputKind;
    use std::collections::BTreeMap;

    fn manifest_with(
        base: BuildOverlay,
        platform_overlays: BTreeMap<Platform, BuildOverlay>,
        build_config_overlays: BTreeMap<String, BuildOverlay>,
    ) -> ProjectManifest {
        ProjectManifest {
            name: "app".to_string(),
            version: "0.1.0".to_string(),
            description: None,
            authors: Vec::new(),
            license: None,
            output_kind: OutputKind::Executable,
            c_standard: None,
            cpp_standard: Some("20".to_string()),
            sources: Vec::new(),
            includes: Vec::new(),
            base,
            platform_overlays,
            compiler_overlays: BTreeMap::new(),
            platform_compiler_overlays: BTreeMap::new(),
            build_config_overlays,
            build_configs_overlays_deprecated: BTreeMap::new(),
            dependencies: Vec::new(),
            precompiled_headers: Vec::new(),
            module_paths: Vec::new(),
            cmake_includes: Vec::new(),
            inject_before_target: None,
            inject_after_target: None,
            packaging: None,
            dependencies_directory: "deps".to_string(),
            workspace: None,
        }
    }

    #[test]
    fn s2_overlay_merge_order() {
        let base = BuildOverlay {
            defines: vec!["A".to_string()],
            ..Default::default()
        };
        let mut platform_overlays = BTreeMap::new();
        platform_overlays.insert(
            Platform::Linux,
            BuildOverlay {
                defines: vec!["B".to_string()],
                ..Default::default()
            },
        );
        let mut build_config_overlays = BTreeMap::new();
        build_config_overlays.insert(
            "Debug".to_string(),
            BuildOverlay {
                defines: vec!["C".to_string()],
                ..Default::default()
            },
        );
        let manifest = manifest_with(base, platform_overlays, build_config_overlays);

        let effective = resolve(&manifest, Platform::Linux, Compiler::Gcc, "Debug");
        assert_eq!(effective.defines, vec!["A", "B", "C"]);
    }

    #[test]
    fn missing_overlay_is_identity() {
        let manifest = manifest_with(BuildOverlay::default(), BTreeMap::new(), BTreeMap::new());
        let effective = resolve(&manifest, Platform::Linux, Compiler::Gcc, "Release");
        assert!(effective.defines.is_empty());
    }

    #[test]
    fn macos_frameworks_dropped_on_linux() {
        let base = BuildOverlay {
            frameworks: vec!["CoreFoundation".to_string()],
            ..Default::default()
        };
        let manifest = manifest_with(base, BTreeMap::new(), BTreeMap::new());
        let effective = resolve(&manifest, Platform::Linux, Compiler::Gcc, "Debug");
        assert!(effective.frameworks.is_empty());
    }

    #[test]
    fn macos_frameworks_kept_on_macos() {
        let base = BuildOverlay {
            frameworks: vec!["CoreFoundation".to_string()],
            ..Default::default()
        };
        let manifest = manifest_with(base, BTreeMap::new(), BTreeMap::new());
        let effective = resolve(&manifest, Platform::MacOs, Compiler::AppleClang, "Debug");
        assert_eq!(effective.frameworks, vec!["CoreFoundation"]);
    }

    #[test]
    fn singular_build_config_wins_over_plural() {
        let mut manifest = manifest_with(BuildOverlay::default(), BTreeMap::new(), BTreeMap::new());
        manifest.build_config_overlays.insert(
            "Debug".to_string(),
            BuildOverlay {
                defines: vec!["SINGULAR".to_string()],
                ..Default::default()
            },
        );
        manifest.build_configs_overlays_deprecated.insert(
            "Debug".to_string(),
            BuildOverlay {
                defines: vec!["PLURAL".to_string()],
                ..Default::default()
            },
        );
        let effective = resolve(&manifest, Platform::Linux, Compiler::Gcc, "Debug");
        assert_eq!(effective.defines, vec!["SINGULAR"]);
    }
}
