//! CMake Emitter (component I): a sequence of small pure writer functions
//! that each append one section of `CMakeLists.txt`, called in the fixed
//! order of §4.9. Every function is infallible — invalid preconditions
//! (no declared language, a missing dependency binding) are checked by
//! [`render`] up front and surfaced as an [`EmitterError`] before any
//! writer runs, keeping determinism (Testable Property #1): the same
//! manifest and resolved dependencies always produce the same bytes.

use cforge_errors::{EmitterError, Error};
use cforge_types::{
    Compiler, Dependency, DependencySourceKind, OutputKind, Platform, ProjectManifest,
    ResolvedDependency, WorkspaceMember,
};
use std::fmt::Write as _;

use crate::translate;

const OVERLAY_COMPILERS: [Compiler; 4] = [
    Compiler::Msvc,
    Compiler::Gcc,
    Compiler::Clang,
    Compiler::AppleClang,
];

/// Render `CMakeLists.txt` for `manifest`, given its already-resolved
/// dependencies and sibling workspace members (for inter-project wiring,
/// empty outside a workspace). Declared build-config names come from
/// [`crate::config_resolver::declared_build_configs`].
///
/// # Errors
/// Returns [`EmitterError::NoLanguages`] if neither `c_standard` nor
/// `cpp_standard` is set, or [`EmitterError::MissingCmakeTarget`] if a
/// dependency has no CMake binding recorded.
pub fn render(
    manifest: &ProjectManifest,
    resolved: &[ResolvedDependency],
    build_configs: &[String],
    workspace_deps: &[&WorkspaceMember],
) -> Result<String, Error> {
    let languages = manifest.languages();
    if languages.is_empty() {
        return Err(EmitterError::NoLanguages.into());
    }
    for dep in resolved {
        if dep.binding.link_target.is_none()
            && dep.binding.add_subdirectory_path.is_none()
            && dep.source != DependencySourceKind::System
        {
            return Err(EmitterError::MissingCmakeTarget {
                name: dep.name.clone(),
            }
            .into());
        }
    }

    let mut out = String::new();
    write_header(&mut out, manifest, &languages);
    write_module_includes(&mut out, manifest);
    write_standards(&mut out, manifest);
    write_platform_compiler_detection(&mut out);
    write_output_dirs(&mut out);
    write_dependencies_before_target(&mut out, resolved);
    write_inject(&mut out, manifest.inject_before_target.as_deref());
    write_target(&mut out, manifest);
    write_version_defines(&mut out, manifest);
    write_include_dirs(&mut out, manifest);
    write_precompiled_headers(&mut out, manifest);
    write_dependencies_after_target(&mut out, manifest, resolved);
    write_inject(&mut out, manifest.inject_after_target.as_deref());
    write_overlays(&mut out, manifest);
    write_portable_flags(&mut out, manifest, build_configs);
    write_system_dependencies(&mut out, resolved);
    write_workspace_wiring(&mut out, manifest, workspace_deps);
    write_tests_subdirectory(&mut out, manifest);
    write_packaging(&mut out, manifest);
    Ok(out)
}

/// Item 1: header comment, `cmake_minimum_required`, `project(...)`.
fn write_header(out: &mut String, manifest: &ProjectManifest, languages: &[&str]) {
    let _ = writeln!(out, "# Generated by cforge. Do not edit by hand.");
    let _ = writeln!(out, "cmake_minimum_required(VERSION 3.20)");
    let _ = writeln!(
        out,
        "project({} VERSION {} LANGUAGES {})",
        manifest.name,
        manifest.version,
        languages.join(" ")
    );
    let _ = writeln!(out);
}

/// Item 2: `CMAKE_MODULE_PATH` additions and declared `include(...)` files.
fn write_module_includes(out: &mut String, manifest: &ProjectManifest) {
    if manifest.module_paths.is_empty() && manifest.cmake_includes.is_empty() {
        return;
    }
    for path in &manifest.module_paths {
        let _ = writeln!(out, "list(APPEND CMAKE_MODULE_PATH \"{path}\")");
    }
    for include in &manifest.cmake_includes {
        let _ = writeln!(out, "include({include})");
    }
    let _ = writeln!(out);
}

/// Item 3: `CMAKE_<LANG>_STANDARD` plus `_REQUIRED`/`_EXTENSIONS`.
fn write_standards(out: &mut String, manifest: &ProjectManifest) {
    if let Some(std) = &manifest.cpp_standard {
        let _ = writeln!(out, "set(CMAKE_CXX_STANDARD {std})");
        let _ = writeln!(out, "set(CMAKE_CXX_STANDARD_REQUIRED ON)");
        let _ = writeln!(out, "set(CMAKE_CXX_EXTENSIONS OFF)");
    }
    if let Some(std) = &manifest.c_standard {
        let _ = writeln!(out, "set(CMAKE_C_STANDARD {std})");
        let _ = writeln!(out, "set(CMAKE_C_STANDARD_REQUIRED ON)");
        let _ = writeln!(out, "set(CMAKE_C_EXTENSIONS OFF)");
    }
    let _ = writeln!(out);
}

/// Item 4: `CFORGE_PLATFORM`/`CFORGE_COMPILER` variables computed at CMake
/// configure time, so one emission serves any downstream build-type.
fn write_platform_compiler_detection(out: &mut String) {
    let _ = writeln!(out, "if(WIN32)");
    let _ = writeln!(out, "  set(CFORGE_PLATFORM \"windows\")");
    let _ = writeln!(out, "elseif(APPLE)");
    let _ = writeln!(out, "  set(CFORGE_PLATFORM \"macos\")");
    let _ = writeln!(out, "elseif(UNIX)");
    let _ = writeln!(out, "  set(CFORGE_PLATFORM \"linux\")");
    let _ = writeln!(out, "else()");
    let _ = writeln!(out, "  set(CFORGE_PLATFORM \"unknown\")");
    let _ = writeln!(out, "endif()");
    let _ = writeln!(out);
    let _ = writeln!(out, "if(MSVC)");
    let _ = writeln!(out, "  set(CFORGE_COMPILER \"msvc\")");
    let _ = writeln!(out, "elseif(CMAKE_CXX_COMPILER_ID STREQUAL \"AppleClang\")");
    let _ = writeln!(out, "  set(CFORGE_COMPILER \"apple_clang\")");
    let _ = writeln!(out, "elseif(CMAKE_CXX_COMPILER_ID MATCHES \"Clang\")");
    let _ = writeln!(out, "  set(CFORGE_COMPILER \"clang\")");
    let _ = writeln!(out, "elseif(CMAKE_CXX_COMPILER_ID MATCHES \"GNU\")");
    let _ = writeln!(out, "  set(CFORGE_COMPILER \"gcc\")");
    let _ = writeln!(out, "else()");
    let _ = writeln!(out, "  set(CFORGE_COMPILER \"unknown\")");
    let _ = writeln!(out, "endif()");
    let _ = writeln!(out);
}

/// Item 5: per-configuration bin/lib output directories.
fn write_output_dirs(out: &mut String) {
    let _ = writeln!(out, "foreach(CFORGE_CFG IN ITEMS Debug Release RelWithDebInfo MinSizeRel)");
    let _ = writeln!(out, "  string(TOUPPER ${{CFORGE_CFG}} CFORGE_CFG_UPPER)");
    let _ = writeln!(
        out,
        "  set(CMAKE_RUNTIME_OUTPUT_DIRECTORY_${{CFORGE_CFG_UPPER}} \"${{CMAKE_BINARY_DIR}}/bin/${{CFORGE_CFG}}\")"
    );
    let _ = writeln!(
        out,
        "  set(CMAKE_LIBRARY_OUTPUT_DIRECTORY_${{CFORGE_CFG_UPPER}} \"${{CMAKE_BINARY_DIR}}/lib/${{CFORGE_CFG}}\")"
    );
    let _ = writeln!(
        out,
        "  set(CMAKE_ARCHIVE_OUTPUT_DIRECTORY_${{CFORGE_CFG_UPPER}} \"${{CMAKE_BINARY_DIR}}/lib/${{CFORGE_CFG}}\")"
    );
    let _ = writeln!(out, "endforeach()");
    let _ = writeln!(out, "set(CMAKE_RUNTIME_OUTPUT_DIRECTORY \"${{CMAKE_BINARY_DIR}}/bin\")");
    let _ = writeln!(out, "set(CMAKE_LIBRARY_OUTPUT_DIRECTORY \"${{CMAKE_BINARY_DIR}}/lib\")");
    let _ = writeln!(out);
}

/// Item 6 phase 1: `FetchContent_Declare`/`add_subdirectory` preambles,
/// emitted before the target so `FetchContent_MakeAvailable` targets exist
/// for `target_link_libraries` to reference.
fn write_dependencies_before_target(out: &mut String, resolved: &[ResolvedDependency]) {
    let fetch_content: Vec<&ResolvedDependency> = resolved
        .iter()
        .filter(|d| d.binding.fetch_content_url.is_some())
        .collect();
    if !fetch_content.is_empty() {
        let _ = writeln!(out, "include(FetchContent)");
        for dep in &fetch_content {
            let url = dep.binding.fetch_content_url.as_deref().unwrap_or_default();
            let _ = writeln!(out, "FetchContent_Declare(");
            let _ = writeln!(out, "  {}", dep.name);
            let _ = writeln!(out, "  GIT_REPOSITORY \"{url}\"");
            if let Some(tag) = &dep.binding.fetch_content_tag {
                let _ = writeln!(out, "  GIT_TAG \"{tag}\"");
            }
            let _ = writeln!(out, "  GIT_SHALLOW TRUE");
            let _ = writeln!(out, ")");
            for (key, value) in &dep.binding.cmake_options {
                let _ = writeln!(out, "set({key} \"{value}\" CACHE BOOL \"\" FORCE)");
            }
        }
        for dep in &fetch_content {
            let _ = writeln!(out, "FetchContent_MakeAvailable({})", dep.name);
        }
        let _ = writeln!(out);
    }

    for dep in resolved.iter().filter(|d| d.binding.add_subdirectory_path.is_some()) {
        let path = dep.binding.add_subdirectory_path.as_deref().unwrap_or_default();
        let _ = writeln!(out, "add_subdirectory(\"{path}\")");
        for include in &dep.binding.include_dirs {
            let _ = writeln!(out, "include_directories(\"{include}\")");
        }
    }
    let _ = writeln!(out);
}

/// CMake escape hatch: verbatim CMake text injected either immediately
/// before or immediately after the target declaration (§3 "CMake escape
/// hatches"), e.g. for a custom command the manifest's declarative surface
/// has no dedicated field for.
fn write_inject(out: &mut String, snippet: Option<&str>) {
    if let Some(snippet) = snippet {
        let _ = writeln!(out, "{snippet}");
        let _ = writeln!(out);
    }
}

/// Item 7: the project's own target, by declared output kind.
fn write_target(out: &mut String, manifest: &ProjectManifest) {
    let sources = if manifest.sources.is_empty() {
        String::new()
    } else {
        format!(" {}", manifest.sources.join(" "))
    };
    match manifest.output_kind {
        OutputKind::Executable => {
            let _ = writeln!(out, "add_executable(${{PROJECT_NAME}}{sources})");
        }
        OutputKind::StaticLib => {
            let _ = writeln!(out, "add_library(${{PROJECT_NAME}} STATIC{sources})");
        }
        OutputKind::SharedLib => {
            let _ = writeln!(out, "add_library(${{PROJECT_NAME}} SHARED{sources})");
        }
        OutputKind::HeaderOnly => {
            let _ = writeln!(out, "add_library(${{PROJECT_NAME}} INTERFACE)");
        }
    }
    let _ = writeln!(out);
}

fn visibility_keyword(manifest: &ProjectManifest) -> &'static str {
    if manifest.output_kind == OutputKind::HeaderOnly {
        "INTERFACE"
    } else {
        "PUBLIC"
    }
}

/// Item 8: version-info compile definitions, both `<NAME>_VERSION*` and
/// the unprefixed `PROJECT_VERSION*` CMake already provides are exposed to
/// the target.
fn write_version_defines(out: &mut String, manifest: &ProjectManifest) {
    let upper = manifest.name.to_uppercase().replace(['-', ' '], "_");
    let vis = visibility_keyword(manifest);
    let _ = writeln!(
        out,
        "target_compile_definitions(${{PROJECT_NAME}} {vis}"
    );
    let _ = writeln!(out, "  {upper}_VERSION=\"${{PROJECT_VERSION}}\"");
    let _ = writeln!(out, "  {upper}_VERSION_MAJOR=${{PROJECT_VERSION_MAJOR}}");
    let _ = writeln!(out, "  {upper}_VERSION_MINOR=${{PROJECT_VERSION_MINOR}}");
    let _ = writeln!(out, "  {upper}_VERSION_PATCH=${{PROJECT_VERSION_PATCH}}");
    let _ = writeln!(out, "  PROJECT_VERSION=\"${{PROJECT_VERSION}}\"");
    let _ = writeln!(out, ")");
    let _ = writeln!(out);
}

/// Item 9: include directories, `PUBLIC` by default, `INTERFACE` for
/// header-only targets.
fn write_include_dirs(out: &mut String, manifest: &ProjectManifest) {
    if manifest.includes.is_empty() {
        return;
    }
    let vis = visibility_keyword(manifest);
    let _ = writeln!(out, "target_include_directories(${{PROJECT_NAME}} {vis}");
    for include in &manifest.includes {
        let _ = writeln!(out, "  \"{include}\"");
    }
    let _ = writeln!(out, ")");
    let _ = writeln!(out);
}

/// Declared precompiled headers (§3), wired via CMake's own
/// `target_precompile_headers`. Header-only targets have no compiled
/// translation units to precompile, so the list is skipped for them.
fn write_precompiled_headers(out: &mut String, manifest: &ProjectManifest) {
    if manifest.precompiled_headers.is_empty() || manifest.output_kind == OutputKind::HeaderOnly {
        return;
    }
    let vis = visibility_keyword(manifest);
    let _ = writeln!(out, "target_precompile_headers(${{PROJECT_NAME}} {vis}");
    for pch in &manifest.precompiled_headers {
        let _ = writeln!(out, "  \"{}\"", pch.header);
    }
    let _ = writeln!(out, ")");
    let _ = writeln!(out);
}

/// Item 6 phase 2: `target_link_libraries` after the target exists.
fn write_dependencies_after_target(
    out: &mut String,
    manifest: &ProjectManifest,
    resolved: &[ResolvedDependency],
) {
    let linkable: Vec<&str> = resolved
        .iter()
        .filter(|d| {
            manifest
                .dependencies
                .iter()
                .find(|decl| decl.name() == d.name)
                .is_none_or(dependency_wants_link)
        })
        .filter_map(|d| d.binding.link_target.as_deref())
        .collect();
    if linkable.is_empty() {
        return;
    }
    let vis = visibility_keyword(manifest);
    let _ = writeln!(out, "target_link_libraries(${{PROJECT_NAME}} {vis}");
    for target in linkable {
        let _ = writeln!(out, "  {target}");
    }
    let _ = writeln!(out, ")");
    let _ = writeln!(out);
}

fn dependency_wants_link(dep: &Dependency) -> bool {
    match dep {
        Dependency::Git { link, .. } => *link,
        _ => true,
    }
}

/// Item 10: one `if(CFORGE_PLATFORM STREQUAL ...)` / `if(CFORGE_COMPILER
/// STREQUAL ...)` block per active overlay; mixed MSVC-style (`/`) and
/// Unix-style (`-`) flags in the same list are split into `if(MSVC)` /
/// `if(NOT MSVC)` subblocks.
fn write_overlays(out: &mut String, manifest: &ProjectManifest) {
    let vis = visibility_keyword(manifest);

    if !manifest.base.defines.is_empty()
        || !manifest.base.flags.is_empty()
        || !manifest.base.links.is_empty()
        || !manifest.base.frameworks.is_empty()
        || !manifest.base.cmake_args.is_empty()
    {
        write_overlay_body(out, &manifest.base, vis, None);
    }

    for (platform, overlay) in &manifest.platform_overlays {
        let _ = writeln!(
            out,
            "if(CFORGE_PLATFORM STREQUAL \"{}\")",
            platform.as_str()
        );
        write_overlay_body(out, overlay, vis, Some("  "));
        let _ = writeln!(out, "endif()");
    }

    for (compiler, overlay) in &manifest.compiler_overlays {
        let _ = writeln!(
            out,
            "if(CFORGE_COMPILER STREQUAL \"{}\")",
            compiler.as_str()
        );
        write_overlay_body(out, overlay, vis, Some("  "));
        let _ = writeln!(out, "endif()");
    }

    for ((platform, compiler), overlay) in &manifest.platform_compiler_overlays {
        let _ = writeln!(
            out,
            "if(CFORGE_PLATFORM STREQUAL \"{}\" AND CFORGE_COMPILER STREQUAL \"{}\")",
            platform.as_str(),
            compiler.as_str()
        );
        write_overlay_body(out, overlay, vis, Some("  "));
        let _ = writeln!(out, "endif()");
    }

    for (name, overlay) in &manifest.build_config_overlays {
        let _ = writeln!(out, "if(CMAKE_BUILD_TYPE STREQUAL \"{name}\")");
        write_overlay_body(out, overlay, vis, Some("  "));
        let _ = writeln!(out, "endif()");
    }

    let _ = writeln!(out);
}

fn write_overlay_body(out: &mut String, overlay: &cforge_types::BuildOverlay, vis: &str, indent: Option<&str>) {
    let pad = indent.unwrap_or("");
    if !overlay.defines.is_empty() {
        let _ = writeln!(out, "{pad}target_compile_definitions(${{PROJECT_NAME}} {vis}");
        for define in &overlay.defines {
            let _ = writeln!(out, "{pad}  {define}");
        }
        let _ = writeln!(out, "{pad})");
    }

    let (msvc_flags, unix_flags): (Vec<&String>, Vec<&String>) =
        overlay.flags.iter().partition(|f| f.starts_with('/'));
    if !msvc_flags.is_empty() {
        let _ = writeln!(out, "{pad}if(MSVC)");
        let _ = writeln!(out, "{pad}  target_compile_options(${{PROJECT_NAME}} PRIVATE {})", join_flags(&msvc_flags));
        let _ = writeln!(out, "{pad}endif()");
    }
    if !unix_flags.is_empty() {
        let _ = writeln!(out, "{pad}if(NOT MSVC)");
        let _ = writeln!(out, "{pad}  target_compile_options(${{PROJECT_NAME}} PRIVATE {})", join_flags(&unix_flags));
        let _ = writeln!(out, "{pad}endif()");
    }

    if !overlay.links.is_empty() {
        let _ = writeln!(out, "{pad}target_link_libraries(${{PROJECT_NAME}} {vis}");
        for link in &overlay.links {
            let _ = writeln!(out, "{pad}  {link}");
        }
        let _ = writeln!(out, "{pad})");
    }

    if !overlay.frameworks.is_empty() {
        let _ = writeln!(out, "{pad}if(CFORGE_PLATFORM STREQUAL \"macos\")");
        for framework in &overlay.frameworks {
            let _ = writeln!(
                out,
                "{pad}  find_library({framework}_FRAMEWORK {framework})"
            );
            let _ = writeln!(
                out,
                "{pad}  target_link_libraries(${{PROJECT_NAME}} {vis} ${{{framework}_FRAMEWORK}})"
            );
        }
        let _ = writeln!(out, "{pad}endif()");
    }

    for arg in &overlay.cmake_args {
        let _ = writeln!(out, "{pad}{arg}");
    }
}

fn join_flags(flags: &[&String]) -> String {
    flags.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

/// Item 11: one portable-flags cascade per configuration/platform/compiler
/// overlay that declares portable options, rendered as `if(MSVC) …
/// elseif(CMAKE_CXX_COMPILER_ID MATCHES "Clang") … elseif(... "GNU") …`.
fn write_portable_flags(out: &mut String, manifest: &ProjectManifest, build_configs: &[String]) {
    let vis = visibility_keyword(manifest);
    let mut any = false;

    let mut overlays_with_portable: Vec<(&str, &cforge_types::PortableOptions)> = Vec::new();
    if has_portable_options(&manifest.base.portable) {
        overlays_with_portable.push(("", &manifest.base.portable));
    }
    for name in build_configs {
        if let Some(overlay) = manifest
            .build_config_overlays
            .get(name)
            .or_else(|| manifest.build_configs_overlays_deprecated.get(name))
        {
            if has_portable_options(&overlay.portable) {
                overlays_with_portable.push((name.as_str(), &overlay.portable));
            }
        }
    }

    for (config_name, portable) in overlays_with_portable {
        any = true;
        if config_name.is_empty() {
            let _ = writeln!(out, "# portable options: base");
        } else {
            let _ = writeln!(out, "if(CMAKE_BUILD_TYPE STREQUAL \"{config_name}\")");
        }
        let indent = if config_name.is_empty() { "" } else { "  " };
        write_portable_cascade(out, portable, vis, indent);
        if !config_name.is_empty() {
            let _ = writeln!(out, "endif()");
        }
    }

    if any {
        let _ = writeln!(out);
    }
}

fn has_portable_options(portable: &cforge_types::PortableOptions) -> bool {
    portable.optimize.is_some()
        || portable.warnings.is_some()
        || portable.warnings_as_errors.is_some()
        || portable.debug_info.is_some()
        || portable.lto.is_some()
        || portable.exceptions.is_some()
        || portable.rtti.is_some()
        || !portable.sanitizers.is_empty()
        || portable.stdlib.is_some()
        || portable.hardening.is_some()
        || portable.visibility.is_some()
}

fn write_portable_cascade(out: &mut String, portable: &cforge_types::PortableOptions, vis: &str, pad: &str) {
    let branches = [
        ("if(MSVC)", Compiler::Msvc),
        ("elseif(CMAKE_CXX_COMPILER_ID MATCHES \"Clang\")", Compiler::Clang),
        ("else()", Compiler::Gcc),
    ];
    for (keyword, compiler) in branches {
        let _ = writeln!(out, "{pad}{keyword}");
        let translated = translate::translate(portable, compiler);
        if !translated.compile.is_empty() {
            let _ = writeln!(
                out,
                "{pad}  target_compile_options(${{PROJECT_NAME}} PRIVATE {})",
                translated.compile.join(" ")
            );
        }
        if !translated.link.is_empty() {
            let _ = writeln!(
                out,
                "{pad}  target_link_options(${{PROJECT_NAME}} {vis} {})",
                translated.link.join(" ")
            );
        }
        for dropped in &translated.dropped {
            let _ = writeln!(out, "{pad}  # {dropped}");
        }
    }
    let _ = writeln!(out, "{pad}endif()");
}

/// Item 12: system dependencies via `find_package`/`pkg_check_modules`/
/// manual directives, each guarded by an `if(FOUND)` block.
fn write_system_dependencies(out: &mut String, resolved: &[ResolvedDependency]) {
    let systems: Vec<&ResolvedDependency> = resolved
        .iter()
        .filter(|d| d.source == DependencySourceKind::System)
        .collect();
    if systems.is_empty() {
        return;
    }
    for dep in systems {
        let var = format!("{}_FOUND", dep.name.to_uppercase());
        if let Some(target) = &dep.binding.link_target {
            let _ = writeln!(out, "find_package({} QUIET)", dep.name);
            let _ = writeln!(out, "if({var} OR TARGET {target})");
            let _ = writeln!(out, "  target_link_libraries(${{PROJECT_NAME}} PUBLIC {target})");
            let _ = writeln!(out, "endif()");
        } else {
            let _ = writeln!(out, "find_package(PkgConfig QUIET)");
            let _ = writeln!(out, "if(PkgConfig_FOUND)");
            let _ = writeln!(out, "  pkg_check_modules({} QUIET {})", dep.name.to_uppercase(), dep.name);
            let _ = writeln!(out, "  if({var})");
            for include in &dep.binding.include_dirs {
                let _ = writeln!(out, "    target_include_directories(${{PROJECT_NAME}} PUBLIC \"{include}\")");
            }
            let _ = writeln!(out, "  endif()");
            let _ = writeln!(out, "endif()");
        }
    }
    let _ = writeln!(out);
}

/// Item 13: workspace-member dependency wiring — sibling include paths and
/// `add_dependencies` to enforce build order even without a link.
fn write_workspace_wiring(out: &mut String, manifest: &ProjectManifest, workspace_deps: &[&WorkspaceMember]) {
    if workspace_deps.is_empty() {
        return;
    }
    for member in workspace_deps {
        let sibling = member.path.display();
        let _ = writeln!(
            out,
            "target_include_directories(${{PROJECT_NAME}} PUBLIC \"{sibling}/include\")"
        );
        let _ = writeln!(out, "add_dependencies(${{PROJECT_NAME}} {})", member.name);
        let _ = if manifest.output_kind != OutputKind::HeaderOnly {
            writeln!(
                out,
                "target_link_libraries(${{PROJECT_NAME}} PUBLIC {})",
                member.name
            )
        } else {
            Ok(())
        };
    }
    let _ = writeln!(out);
}

/// Item 14: optional `tests/` subdirectory gated on `BUILD_TESTING`.
fn write_tests_subdirectory(out: &mut String, manifest: &ProjectManifest) {
    let _ = manifest;
    let _ = writeln!(out, "if(EXISTS \"${{CMAKE_CURRENT_SOURCE_DIR}}/tests\" AND IS_DIRECTORY \"${{CMAKE_CURRENT_SOURCE_DIR}}/tests\")");
    let _ = writeln!(out, "  if(BUILD_TESTING)");
    let _ = writeln!(out, "    enable_testing()");
    let _ = writeln!(out, "    add_subdirectory(tests)");
    let _ = writeln!(out, "  endif()");
    let _ = writeln!(out, "endif()");
    let _ = writeln!(out);
}

/// Item 15: packaging glue (CPack variables), verbatim boilerplate driven
/// by the manifest's packaging block.
fn write_packaging(out: &mut String, manifest: &ProjectManifest) {
    let Some(packaging) = &manifest.packaging else {
        return;
    };
    let _ = writeln!(out, "set(CPACK_PACKAGE_NAME \"{}\")", manifest.name);
    let _ = writeln!(out, "set(CPACK_PACKAGE_VERSION \"{}\")", manifest.version);
    if let Some(vendor) = &packaging.vendor {
        let _ = writeln!(out, "set(CPACK_PACKAGE_VENDOR \"{vendor}\")");
    }
    if let Some(contact) = &packaging.contact {
        let _ = writeln!(out, "set(CPACK_PACKAGE_CONTACT \"{contact}\")");
    }
    if !packaging.generators.is_empty() {
        let _ = writeln!(out, "set(CPACK_GENERATOR \"{}\")", packaging.generators.join(";"));
    }
    for (key, value) in &packaging.extra_cpack_vars {
        let _ = writeln!(out, "set({key} \"{value}\")");
    }
    let _ = writeln!(out, "include(CPack)");
    let _ = writeln!(out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cforge_types::{BuildOverlay, CmakeBinding};
    use std::collections::BTreeMap;

    fn minimal_manifest() -> ProjectManifest {
        ProjectManifest {
            name: "demo".to_string(),
            version: "1.0.0".to_string(),
            description: None,
            authors: Vec::new(),
            license: None,
            output_kind: OutputKind::Executable,
            c_standard: None,
            cpp_standard: Some("20".to_string()),
            sources: vec!["src/main.cpp".to_string()],
            includes: vec!["include".to_string()],
            base: BuildOverlay::default(),
            platform_overlays: BTreeMap::new(),
            compiler_overlays: BTreeMap::new(),
            platform_compiler_overlays: BTreeMap::new(),
            build_config_overlays: BTreeMap::new(),
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
    fn no_languages_is_an_error() {
        let mut manifest = minimal_manifest();
        manifest.cpp_standard = None;
        let err = render(&manifest, &[], &["Debug".to_string()], &[]);
        assert!(err.is_err());
    }

    #[test]
    fn emits_executable_target_and_standard() {
        let manifest = minimal_manifest();
        let out = render(&manifest, &[], &["Debug".to_string(), "Release".to_string()], &[]).unwrap();
        assert!(out.contains("add_executable(${PROJECT_NAME} src/main.cpp)"));
        assert!(out.contains("set(CMAKE_CXX_STANDARD 20)"));
        assert!(out.contains("project(demo VERSION 1.0.0 LANGUAGES CXX)"));
    }

    #[test]
    fn is_deterministic_across_two_renders() {
        let manifest = minimal_manifest();
        let configs = vec!["Debug".to_string()];
        let first = render(&manifest, &[], &configs, &[]).unwrap();
        let second = render(&manifest, &[], &configs, &[]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_cmake_target_is_an_error() {
        let manifest = minimal_manifest();
        let dep = ResolvedDependency {
            name: "fmt".to_string(),
            source: DependencySourceKind::Git,
            resolved_version: None,
            path: None,
            content_hash: None,
            binding: CmakeBinding::default(),
        };
        let err = render(&manifest, &[dep], &["Debug".to_string()], &[]);
        assert!(err.is_err());
    }

    #[test]
    fn fetch_content_dependency_renders_declare_and_link() {
        let mut manifest = minimal_manifest();
        manifest.dependencies.push(Dependency::Git {
            name: "fmt".to_string(),
            url: "https://example.com/fmt.git".to_string(),
            git_ref: cforge_types::GitRefSpec {
                commit: None,
                tag: Some("10.0.0".to_string()),
                branch: None,
            },
            shallow: true,
            include: true,
            link: true,
            target: None,
        });
        let dep = ResolvedDependency {
            name: "fmt".to_string(),
            source: DependencySourceKind::Git,
            resolved_version: Some("10.0.0".to_string()),
            path: None,
            content_hash: None,
            binding: CmakeBinding {
                fetch_content_url: Some("https://example.com/fmt.git".to_string()),
                fetch_content_tag: Some("10.0.0".to_string()),
                link_target: Some("fmt::fmt".to_string()),
                ..CmakeBinding::default()
            },
        };
        let out = render(&manifest, &[dep], &["Debug".to_string()], &[]).unwrap();
        assert!(out.contains("FetchContent_Declare("));
        assert!(out.contains("GIT_TAG \"10.0.0\""));
        assert!(out.contains("target_link_libraries(${PROJECT_NAME} PUBLIC\n  fmt::fmt"));
    }

    #[test]
    fn msvc_and_unix_flags_split_into_separate_guards() {
        let mut manifest = minimal_manifest();
        manifest.base.flags = vec!["/W4".to_string(), "-Wall".to_string()];
        let out = render(&manifest, &[], &["Debug".to_string()], &[]).unwrap();
        assert!(out.contains("if(MSVC)"));
        assert!(out.contains("if(NOT MSVC)"));
    }

    #[test]
    fn precompiled_header_renders_target_precompile_headers() {
        let mut manifest = minimal_manifest();
        manifest.precompiled_headers.push(cforge_types::PrecompiledHeader {
            header: "include/pch.hpp".to_string(),
        });
        let out = render(&manifest, &[], &["Debug".to_string()], &[]).unwrap();
        assert!(out.contains("target_precompile_headers(${PROJECT_NAME} PUBLIC"));
        assert!(out.contains("\"include/pch.hpp\""));
    }

    #[test]
    fn header_only_target_skips_precompiled_headers() {
        let mut manifest = minimal_manifest();
        manifest.output_kind = OutputKind::HeaderOnly;
        manifest.sources.clear();
        manifest.precompiled_headers.push(cforge_types::PrecompiledHeader {
            header: "include/pch.hpp".to_string(),
        });
        let out = render(&manifest, &[], &["Debug".to_string()], &[]).unwrap();
        assert!(!out.contains("target_precompile_headers"));
    }

    #[test]
    fn inject_before_and_after_target_are_emitted_in_order() {
        let mut manifest = minimal_manifest();
        manifest.inject_before_target = Some("# before".to_string());
        manifest.inject_after_target = Some("# after".to_string());
        let out = render(&manifest, &[], &["Debug".to_string()], &[]).unwrap();
        let before_pos = out.find("# before").unwrap();
        let target_pos = out.find("add_executable").unwrap();
        let after_pos = out.find("# after").unwrap();
        assert!(before_pos < target_pos);
        assert!(target_pos < after_pos);
    }

    #[test]
    fn base_overlay_with_only_links_is_still_emitted() {
        let mut manifest = minimal_manifest();
        manifest.base.links = vec!["pthread".to_string()];
        let out = render(&manifest, &[], &["Debug".to_string()], &[]).unwrap();
        assert!(out.contains("target_link_libraries(${PROJECT_NAME} PUBLIC\n  pthread"));
    }

    #[test]
    fn base_overlay_with_only_frameworks_is_still_emitted() {
        let mut manifest = minimal_manifest();
        manifest.base.frameworks = vec!["CoreFoundation".to_string()];
        let out = render(&manifest, &[], &["Debug".to_string()], &[]).unwrap();
        assert!(out.contains("find_library(CoreFoundation_FRAMEWORK CoreFoundation)"));
    }

    #[test]
    fn base_overlay_with_only_cmake_args_is_still_emitted() {
        let mut manifest = minimal_manifest();
        manifest.base.cmake_args = vec!["set(FOO ON)".to_string()];
        let out = render(&manifest, &[], &["Debug".to_string()], &[]).unwrap();
        assert!(out.contains("set(FOO ON)"));
    }
}
