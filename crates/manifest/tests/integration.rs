//! Integration tests for the manifest loader: on-disk round trips and the
//! legacy-workspace-file / deprecated-overlay precedence rules.

use cforge_manifest::{load_project_dir, load_workspace_dir, validate_project};
use cforge_types::OutputKind;

#[tokio::test]
async fn loads_full_project_manifest_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(
        dir.path().join("cforge.toml"),
        r#"
name = "curl-client"
version = "8.5.0"
description = "Command line HTTP client"
authors = ["cforge Contributors"]
license = "MIT"
output_kind = "executable"
cpp_standard = "20"
sources = ["src/main.cpp"]
includes = ["include"]

[[dependencies]]
source = "registry"
name = "fmt"
version = "^10.1.0"

[[dependencies]]
source = "system"
name = "OpenSSL"
kind = "find_package"
components = ["Crypto", "SSL"]
"#,
    )
    .await
    .unwrap();

    let loaded = load_project_dir(dir.path()).await.unwrap();
    assert_eq!(loaded.manifest.name, "curl-client");
    assert_eq!(loaded.manifest.output_kind, OutputKind::Executable);
    assert_eq!(loaded.manifest.dependencies.len(), 2);
    assert_eq!(loaded.manifest.dependencies[0].name(), "fmt");
    assert!(loaded.warnings.is_empty());
}

#[tokio::test]
async fn rejects_manifest_with_duplicate_dependency_names() {
    let dir = tempfile::tempdir().unwrap();
    let content = r#"
name = "dup"
version = "1.0.0"
output_kind = "static_lib"
c_standard = "17"

[[dependencies]]
source = "registry"
name = "zlib"
version = "1.3.0"

[[dependencies]]
source = "registry"
name = "zlib"
version = "1.2.0"
"#;
    let manifest: cforge_types::ProjectManifest = toml::from_str(content).unwrap();
    assert!(validate_project(&manifest).is_err());

    tokio::fs::write(dir.path().join("cforge.toml"), content)
        .await
        .unwrap();
    assert!(load_project_dir(dir.path()).await.is_err());
}

#[tokio::test]
async fn missing_manifest_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_project_dir(dir.path()).await.is_err());
}

#[tokio::test]
async fn falls_back_to_legacy_workspace_file_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(
        dir.path().join("cforge.workspace.toml"),
        r#"
name = "monorepo"
version = "0.1.0"
output_kind = "executable"
cpp_standard = "17"

[workspace]
name = "monorepo"
default_startup = "app"

[[workspace.members]]
name = "app"
path = "app"
startup = true
"#,
    )
    .await
    .unwrap();

    let loaded = load_workspace_dir(dir.path()).await.unwrap();
    let workspace = loaded.manifest.workspace.as_ref().unwrap();
    assert_eq!(workspace.name, "monorepo");
    assert_eq!(workspace.members.len(), 1);
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains("deprecated"));
}

#[tokio::test]
async fn rejects_workspace_with_duplicate_member_names() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(
        dir.path().join("cforge.toml"),
        r#"
name = "monorepo"
version = "0.1.0"
output_kind = "executable"
cpp_standard = "17"

[workspace]
name = "monorepo"

[[workspace.members]]
name = "app"
path = "app"

[[workspace.members]]
name = "app"
path = "app2"
"#,
    )
    .await
    .unwrap();

    assert!(load_workspace_dir(dir.path()).await.is_err());
}
