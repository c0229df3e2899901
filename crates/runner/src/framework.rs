//! Framework auto-detection and output parsing (component M): each target
//! is associated with a test framework, either declared explicitly or
//! detected from its source content, and that framework's adapter turns
//! raw stdout into a uniform [`CaseResult`] list.

use cforge_events::TestStatus;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

/// A supported C++ test/benchmark framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFramework {
    Catch2,
    GoogleTest,
    Doctest,
    /// No recognized framework; the binary's own exit code is the only
    /// signal (§4.13: "passthrough (native) mode").
    Raw,
}

impl TestFramework {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Catch2 => "catch2",
            Self::GoogleTest => "googletest",
            Self::Doctest => "doctest",
            Self::Raw => "raw",
        }
    }

    /// Command-line arguments this framework needs to produce
    /// machine-parseable output (§4.13: "list/filter/verbose/JSON as
    /// applicable").
    #[must_use]
    pub fn run_args(self) -> Vec<&'static str> {
        match self {
            Self::Catch2 => vec!["--reporter", "compact"],
            Self::GoogleTest => vec!["--gtest_print_time=0"],
            Self::Doctest => vec!["--reporters=console", "--no-colors=true"],
            Self::Raw => Vec::new(),
        }
    }
}

/// Detect a target's framework from its source content. Declared
/// frameworks (manifest-level, not modeled here) always take precedence
/// over detection; this is the fallback path.
#[must_use]
pub fn detect_from_source(content: &str) -> TestFramework {
    if content.contains("catch2/catch") || content.contains("CATCH_CONFIG_MAIN") || content.contains("TEST_CASE(") {
        TestFramework::Catch2
    } else if content.contains("gtest/gtest.h") || content.contains("TEST(") || content.contains("TEST_F(") {
        TestFramework::GoogleTest
    } else if content.contains("doctest/doctest.h") || content.contains("DOCTEST_") {
        TestFramework::Doctest
    } else {
        TestFramework::Raw
    }
}

/// One parsed test case result, independent of which framework produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    pub suite: Option<String>,
    pub name: String,
    pub status: TestStatus,
    pub duration: Duration,
    pub message: Option<String>,
}

static GTEST_RUN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\s*RUN\s*\]\s*(\S+)\.(\S+)").expect("valid regex"));
static GTEST_RESULT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\s*(OK|FAILED)\s*\]\s*(\S+)\.(\S+)(?:\s*\((\d+)\s*ms\))?").expect("valid regex")
});
static CATCH2_RESULT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?):\s*(passed|failed)(?::\s*(.*))?$").expect("valid regex"));

/// Parse `output` per `framework`'s conventions into a uniform result list.
/// Unrecognized lines are ignored; an empty result list with a nonzero
/// process exit code is reported by the caller as `UnrecognizedOutput`.
#[must_use]
pub fn parse_output(framework: TestFramework, output: &str) -> Vec<CaseResult> {
    match framework {
        TestFramework::GoogleTest => parse_googletest(output),
        TestFramework::Catch2 | TestFramework::Doctest => parse_catch_style(output),
        TestFramework::Raw => Vec::new(),
    }
}

fn parse_googletest(output: &str) -> Vec<CaseResult> {
    let mut results = Vec::new();
    for line in output.lines() {
        if let Some(captures) = GTEST_RESULT_LINE.captures(line) {
            let status = if &captures[1] == "OK" {
                TestStatus::Passed
            } else {
                TestStatus::Failed
            };
            let millis: u64 = captures.get(4).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
            results.push(CaseResult {
                suite: Some(captures[2].to_string()),
                name: captures[3].to_string(),
                status,
                duration: Duration::from_millis(millis),
                message: None,
            });
        }
    }
    results
}

fn parse_catch_style(output: &str) -> Vec<CaseResult> {
    let mut results = Vec::new();
    for line in output.lines() {
        if let Some(captures) = CATCH2_RESULT_LINE.captures(line.trim()) {
            let status = if &captures[2] == "passed" {
                TestStatus::Passed
            } else {
                TestStatus::Failed
            };
            results.push(CaseResult {
                suite: None,
                name: captures[1].trim().to_string(),
                status,
                duration: Duration::ZERO,
                message: captures.get(3).map(|m| m.as_str().to_string()),
            });
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_googletest_from_include() {
        assert_eq!(detect_from_source("#include <gtest/gtest.h>"), TestFramework::GoogleTest);
    }

    #[test]
    fn detects_catch2_from_macro() {
        assert_eq!(detect_from_source("TEST_CASE(\"adds\") {}"), TestFramework::Catch2);
    }

    #[test]
    fn unrecognized_source_is_raw() {
        assert_eq!(detect_from_source("int main() { return 0; }"), TestFramework::Raw);
    }

    #[test]
    fn parses_googletest_run_output() {
        let output = "[ RUN      ] SuiteA.CaseOne\n[       OK ] SuiteA.CaseOne (3 ms)\n[ RUN      ] SuiteA.CaseTwo\n[  FAILED  ] SuiteA.CaseTwo (1 ms)\n";
        let results = parse_output(TestFramework::GoogleTest, output);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, TestStatus::Passed);
        assert_eq!(results[1].status, TestStatus::Failed);
        assert_eq!(results[1].suite.as_deref(), Some("SuiteA"));
    }

    #[test]
    fn parses_catch2_compact_output() {
        let output = "example.cpp:12: Parser handles empty input: passed\nexample.cpp:20: Parser rejects garbage: failed: expected throw\n";
        let results = parse_output(TestFramework::Catch2, output);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].status, TestStatus::Failed);
        assert_eq!(results[1].message.as_deref(), Some("expected throw"));
    }
}
