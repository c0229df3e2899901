//! Build-output line parsing (§4.12): recognizes Ninja (`[N/M]`), Make
//! (`[NN%]`), and MSBuild progress forms well enough to drive a progress
//! indicator; everything else passes through as a plain output line.

use regex::Regex;
use std::sync::LazyLock;

static NINJA_PROGRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\d+)/(\d+)\]\s*(.*)$").expect("valid regex"));
static MAKE_PROGRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\s*(\d+)%\]\s*(.*)$").expect("valid regex"));
static MSBUILD_PROGRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)>(.*\.(?:cpp|cc|cxx|c))\b").expect("valid regex")
});

/// A recognized progress event parsed from one line of build output.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedProgress {
    pub fraction: f64,
    pub current_file: Option<String>,
}

/// Parse one line of build output, returning `Some` if it matches a known
/// generator's progress form.
#[must_use]
pub fn parse_progress_line(line: &str) -> Option<ParsedProgress> {
    if let Some(captures) = NINJA_PROGRESS.captures(line) {
        let current: f64 = captures[1].parse().ok()?;
        let total: f64 = captures[2].parse().ok()?;
        let rest = captures[3].trim();
        return Some(ParsedProgress {
            fraction: if total > 0.0 { current / total } else { 0.0 },
            current_file: (!rest.is_empty()).then(|| rest.to_string()),
        });
    }
    if let Some(captures) = MAKE_PROGRESS.captures(line) {
        let percent: f64 = captures[1].parse().ok()?;
        let rest = captures[2].trim();
        return Some(ParsedProgress {
            fraction: percent / 100.0,
            current_file: (!rest.is_empty()).then(|| rest.to_string()),
        });
    }
    if let Some(captures) = MSBUILD_PROGRESS.captures(line) {
        return Some(ParsedProgress {
            fraction: 0.0,
            current_file: Some(captures[2].trim().to_string()),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ninja_progress() {
        let parsed = parse_progress_line("[12/48] Building CXX object src/main.cpp.o").unwrap();
        assert!((parsed.fraction - 0.25).abs() < f64::EPSILON);
        assert_eq!(parsed.current_file.as_deref(), Some("Building CXX object src/main.cpp.o"));
    }

    #[test]
    fn parses_make_percent() {
        let parsed = parse_progress_line("[ 50%] Building CXX object CMakeFiles/x").unwrap();
        assert!((parsed.fraction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_msbuild_file_line() {
        let parsed = parse_progress_line("  1>main.cpp").unwrap();
        assert_eq!(parsed.current_file.as_deref(), Some("main.cpp"));
    }

    #[test]
    fn unrecognized_line_is_none() {
        assert!(parse_progress_line("note: this is just chatter").is_none());
    }
}
