//! Target discovery (component M): enumerate candidate test/benchmark
//! binaries' source roots under the configured directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A discovered test or benchmark target: a name (directory or file stem)
/// and its source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredTarget {
    pub name: String,
    pub source_dir: PathBuf,
}

/// Discover targets under `root` (a project's `tests/` or `bench/`
/// directory): one target per immediate subdirectory, or per top-level
/// source file when the directory is flat.
#[must_use]
pub fn discover(root: &Path) -> Vec<DiscoveredTarget> {
    if !root.is_dir() {
        return Vec::new();
    }

    let mut subdirs: Vec<DiscoveredTarget> = Vec::new();
    let mut top_level_sources: Vec<DiscoveredTarget> = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1).into_iter().flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(DiscoveredTarget {
                name: entry.file_name().to_string_lossy().to_string(),
                source_dir: path.to_path_buf(),
            });
        } else if is_source_file(path) {
            if let Some(stem) = path.file_stem() {
                top_level_sources.push(DiscoveredTarget {
                    name: stem.to_string_lossy().to_string(),
                    source_dir: root.to_path_buf(),
                });
            }
        }
    }

    if subdirs.is_empty() {
        top_level_sources
    } else {
        subdirs
    }
}

fn is_source_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("c" | "cc" | "cpp" | "cxx")
    )
}
