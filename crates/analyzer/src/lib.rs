#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Include-Graph Analyzer (component K): parses `#include` directives under
//! a project root, resolves each to a file on disk, builds the resulting
//! adjacency map, and runs DFS cycle detection over it (§4.11, Testable
//! Property #7).
//!
//! Resolution order for each include, per file: the directory of the
//! including file, then the project root, then each configured include
//! path in declared order. Directories matching [`DEFAULT_EXCLUDED_DIRS`]
//! are skipped during the walk.

use cforge_errors::{AnalyzerError, Error};
use cforge_events::{AnalyzerEvent, AppEvent, EventEmitter};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Extensions scanned for `#include` directives unless overridden (§4.11).
pub const DEFAULT_EXTENSIONS: &[&str] = &["h", "hpp", "hxx", "c", "cc", "cpp", "cxx"];

/// Directories skipped during the walk unless overridden (§4.11).
pub const DEFAULT_EXCLUDED_DIRS: &[&str] =
    &["build", "vendor", "deps", "third_party", "external", "node_modules"];

/// Tunables for [`analyze`].
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub extensions: Vec<String>,
    pub excluded_dirs: Vec<String>,
    /// Extra configured include paths, consulted in declared order after
    /// the including file's own directory and the project root.
    pub include_paths: Vec<PathBuf>,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_string()).collect(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| (*s).to_string()).collect(),
            include_paths: Vec::new(),
        }
    }
}

/// One cycle chain, ordered from the cycle root back to itself
/// (`[x.hpp, y.hpp, z.hpp, x.hpp]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub chain: Vec<String>,
}

/// Outcome of one [`analyze`] call.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub project: String,
    pub file_count: usize,
    pub chains: Vec<Cycle>,
}

impl AnalysisReport {
    #[must_use]
    pub fn total_chains(&self) -> usize {
        self.chains.len()
    }
}

fn include_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*#\s*include\s*([<"])([^>"]+)[>"]"#).expect("static include regex")
    })
}

/// Parse every `#include "…"`/`#include <…>` line in `contents`, returning
/// the raw include targets in file order.
#[must_use]
pub fn parse_includes(contents: &str) -> Vec<String> {
    include_regex()
        .captures_iter(contents)
        .map(|caps| caps[2].to_string())
        .collect()
}

/// Walk `project_root`, parse every source file's includes, resolve them to
/// paths on disk, and run DFS cycle detection over the resulting graph.
///
/// # Errors
/// Returns [`AnalyzerError::ProjectDirMissing`] if `project_root` doesn't
/// exist, or [`AnalyzerError::ReadFailed`] if a discovered file can't be
/// read.
pub async fn analyze(
    project_root: &Path,
    project_name: &str,
    options: &AnalyzerOptions,
    events: &impl EventEmitter,
) -> Result<AnalysisReport, Error> {
    if !project_root.exists() {
        return Err(AnalyzerError::ProjectDirMissing {
            path: project_root.display().to_string(),
        }
        .into());
    }

    let files = discover_source_files(project_root, options);

    events.emit(AppEvent::Analyzer(AnalyzerEvent::ScanStarted {
        project: project_name.to_string(),
        file_count: files.len(),
    }));

    let mut adjacency: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for file in &files {
        let contents = tokio::fs::read_to_string(file)
            .await
            .map_err(|e| AnalyzerError::ReadFailed {
                path: file.display().to_string(),
                message: e.to_string(),
            })?;

        let mut resolved = Vec::new();
        for raw in parse_includes(&contents) {
            if let Some(target) = resolve_include(file, project_root, &raw, options) {
                resolved.push(target);
            }
        }
        adjacency.insert(file.clone(), resolved);
    }

    let chains = detect_cycles(&adjacency, project_root);
    for cycle in &chains {
        events.emit(AppEvent::Analyzer(AnalyzerEvent::CycleFound {
            chain: cycle.chain.clone(),
        }));
    }

    events.emit(AppEvent::Analyzer(AnalyzerEvent::Completed {
        project: project_name.to_string(),
        total_chains: chains.len(),
    }));

    Ok(AnalysisReport {
        project: project_name.to_string(),
        file_count: files.len(),
        chains,
    })
}

fn discover_source_files(project_root: &Path, options: &AnalyzerOptions) -> Vec<PathBuf> {
    let exts: HashSet<&str> = options.extensions.iter().map(String::as_str).collect();
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(project_root)
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| !options.excluded_dirs.iter().any(|ex| ex == name))
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| exts.contains(ext))
        })
        .map(|entry| entry.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Resolve one raw `#include` target against: the including file's own
/// directory, then `project_root`, then each of `options.include_paths` in
/// order (§4.11).
fn resolve_include(
    including_file: &Path,
    project_root: &Path,
    raw: &str,
    options: &AnalyzerOptions,
) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(parent) = including_file.parent() {
        candidates.push(parent.join(raw));
    }
    candidates.push(project_root.join(raw));
    for include_path in &options.include_paths {
        candidates.push(include_path.join(raw));
    }

    candidates.into_iter().find(|candidate| candidate.is_file())
}

/// DFS over `adjacency` with an explicit recursion-stack, reporting one
/// chain per back-edge sliced from the back-edge target to the current
/// node (§9 "Workspace cycle detection must return the actual cycle").
fn detect_cycles(
    adjacency: &BTreeMap<PathBuf, Vec<PathBuf>>,
    project_root: &Path,
) -> Vec<Cycle> {
    let mut visited: HashSet<&Path> = HashSet::new();
    let mut on_stack: Vec<&Path> = Vec::new();
    let mut chains = Vec::new();

    for node in adjacency.keys() {
        visit(node.as_path(), adjacency, &mut visited, &mut on_stack, &mut chains, project_root);
    }
    chains
}

fn visit<'a>(
    node: &'a Path,
    adjacency: &'a BTreeMap<PathBuf, Vec<PathBuf>>,
    visited: &mut HashSet<&'a Path>,
    on_stack: &mut Vec<&'a Path>,
    chains: &mut Vec<Cycle>,
    project_root: &Path,
) {
    if visited.contains(node) {
        return;
    }
    if let Some(pos) = on_stack.iter().position(|n| *n == node) {
        let mut chain: Vec<String> = on_stack[pos..]
            .iter()
            .map(|p| display_relative(p, project_root))
            .collect();
        chain.push(display_relative(node, project_root));
        chains.push(Cycle { chain });
        return;
    }

    on_stack.push(node);
    if let Some(targets) = adjacency.get(node) {
        for target in targets {
            visit(target.as_path(), adjacency, visited, on_stack, chains, project_root);
        }
    }
    on_stack.pop();
    visited.insert(node);
}

fn display_relative(path: &Path, project_root: &Path) -> String {
    path.strip_prefix(project_root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Render a report as an indented tree of chains, one per cycle.
#[must_use]
pub fn render_tree(report: &AnalysisReport) -> String {
    if report.chains.is_empty() {
        return format!("{}: no include cycles found ({} files scanned)", report.project, report.file_count);
    }
    let mut out = format!("{}: {} cycle(s) found\n", report.project, report.chains.len());
    for (index, cycle) in report.chains.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", index + 1, cycle.chain.join(" -> ")));
    }
    out
}

/// Render a report as JSON: `{"project", "file_count", "total_chains",
/// "chains": [{"files": [...]}]}` (§4.11, Testable Property #7, S5).
///
/// # Panics
/// Never: the value built here always serializes.
#[must_use]
pub fn render_json(report: &AnalysisReport) -> String {
    let chains: Vec<serde_json::Value> = report
        .chains
        .iter()
        .map(|c| serde_json::json!({ "files": c.chain }))
        .collect();
    serde_json::json!({
        "project": report.project,
        "file_count": report.file_count,
        "total_chains": report.chains.len(),
        "chains": chains,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cforge_events::EventSender;

    #[test]
    fn parses_both_include_forms() {
        let src = "#include <vector>\n#include \"local.hpp\"\nint x;\n";
        let includes = parse_includes(src);
        assert_eq!(includes, vec!["vector".to_string(), "local.hpp".to_string()]);
    }

    #[test]
    fn ignores_non_include_lines() {
        let src = "// #include \"commented.hpp\" is not a directive on its own line check\nint x;\n";
        // A leading `//` before `#include` does not match our anchored regex
        // since it requires the line (after whitespace) to start with `#`.
        assert!(parse_includes(src).is_empty());
    }

    async fn write(dir: &Path, name: &str, contents: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.unwrap();
        }
        tokio::fs::write(path, contents).await.unwrap();
    }

    #[tokio::test]
    async fn detects_a_three_file_cycle() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "x.hpp", "#include \"y.hpp\"\n").await;
        write(dir.path(), "y.hpp", "#include \"z.hpp\"\n").await;
        write(dir.path(), "z.hpp", "#include \"x.hpp\"\n").await;

        let (tx, _rx): (EventSender, _) = cforge_events::channel();
        let report = analyze(dir.path(), "demo", &AnalyzerOptions::default(), &tx)
            .await
            .unwrap();

        assert_eq!(report.total_chains(), 1);
        let chain = &report.chains[0].chain;
        assert_eq!(chain.first(), chain.last());
        assert_eq!(chain.len(), 4);
        assert!(chain.contains(&"x.hpp".to_string()));
        assert!(chain.contains(&"y.hpp".to_string()));
        assert!(chain.contains(&"z.hpp".to_string()));
    }

    #[tokio::test]
    async fn acyclic_graph_reports_no_chains() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.hpp", "#include \"b.hpp\"\n").await;
        write(dir.path(), "b.hpp", "// no includes\n").await;

        let (tx, _rx): (EventSender, _) = cforge_events::channel();
        let report = analyze(dir.path(), "demo", &AnalyzerOptions::default(), &tx)
            .await
            .unwrap();
        assert_eq!(report.total_chains(), 0);
    }

    #[tokio::test]
    async fn excluded_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.hpp", "#include \"vendored.hpp\"\n").await;
        write(dir.path(), "vendor/vendored.hpp", "#include \"a.hpp\"\n").await;

        let (tx, _rx): (EventSender, _) = cforge_events::channel();
        let report = analyze(dir.path(), "demo", &AnalyzerOptions::default(), &tx)
            .await
            .unwrap();
        // vendor/vendored.hpp is never scanned, and a.hpp's include of it
        // can't resolve to a file under the excluded tree, so no cycle.
        assert_eq!(report.total_chains(), 0);
    }

    #[tokio::test]
    async fn missing_project_dir_is_an_error() {
        let (tx, _rx): (EventSender, _) = cforge_events::channel();
        let err = analyze(
            Path::new("/nonexistent/cforge-analyzer-test"),
            "demo",
            &AnalyzerOptions::default(),
            &tx,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Analyzer(AnalyzerError::ProjectDirMissing { .. })));
    }

    #[test]
    fn json_rendering_includes_total_chains() {
        let report = AnalysisReport {
            project: "demo".to_string(),
            file_count: 3,
            chains: vec![Cycle {
                chain: vec!["x.hpp".into(), "y.hpp".into(), "z.hpp".into(), "x.hpp".into()],
            }],
        };
        let json = render_json(&report);
        assert!(json.contains("\"total_chains\":1"));
        assert!(json.contains("x.hpp"));
    }
}
