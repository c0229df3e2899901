#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Test/Benchmark Runner (component M): discovers targets, builds each via
//! a `cmake --build --target` invocation, executes the produced binary,
//! and parses its output into a uniform result record.

pub mod discovery;
pub mod framework;

use cforge_errors::{Error, RunnerError};
use cforge_events::{AppEvent, EventEmitter, EventSender, FailureContext, TestEvent, TestStatus};
use cforge_process::{ProcessSpawn, Spawn};
use discovery::DiscoveredTarget;
use framework::TestFramework;
use std::path::Path;
use std::time::{Duration, Instant};

/// Aggregate outcome of running every discovered target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub timed_out: usize,
}

impl RunSummary {
    fn record(&mut self, status: TestStatus) {
        match status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
            TestStatus::Skipped => self.skipped += 1,
            TestStatus::Timeout => self.timed_out += 1,
        }
    }
}

/// Discover, build, and run every target under `targets_dir` (a project's
/// `tests/` or `bench/` directory), aggregating results.
///
/// # Errors
/// Returns [`RunnerError::NoTargetsFound`] if discovery finds nothing.
pub async fn run_all(
    spawner: &dyn ProcessSpawn,
    project_dir: &Path,
    build_config: &str,
    targets_dir: &Path,
    per_target_timeout: Duration,
    project: &str,
    events: &EventSender,
) -> Result<RunSummary, Error> {
    events.emit(AppEvent::Test(TestEvent::DiscoveryStarted {
        project: project.to_string(),
        directory: targets_dir.display().to_string(),
    }));

    let targets = discovery::discover(targets_dir);
    if targets.is_empty() {
        return Err(RunnerError::NoTargetsFound {
            path: targets_dir.display().to_string(),
        }
        .into());
    }

    events.emit(AppEvent::Test(TestEvent::DiscoveryCompleted {
        project: project.to_string(),
        targets: targets.iter().map(|t| t.name.clone()).collect(),
    }));

    let start = Instant::now();
    let mut summary = RunSummary::default();

    for target in &targets {
        match run_one_target(spawner, project_dir, build_config, target, per_target_timeout, events).await {
            Ok(per_target) => {
                summary.passed += per_target.passed;
                summary.failed += per_target.failed;
                summary.skipped += per_target.skipped;
                summary.timed_out += per_target.timed_out;
            }
            Err(error) => {
                events.emit(AppEvent::Test(TestEvent::TargetFailed {
                    target: target.name.clone(),
                    failure: FailureContext::from(&error),
                }));
                summary.failed += 1;
            }
        }
    }

    events.emit(AppEvent::Test(TestEvent::Summary {
        project: project.to_string(),
        passed: summary.passed,
        failed: summary.failed,
        skipped: summary.skipped,
        timed_out: summary.timed_out,
        duration: start.elapsed(),
    }));

    Ok(summary)
}

async fn run_one_target(
    spawner: &dyn ProcessSpawn,
    project_dir: &Path,
    build_config: &str,
    target: &DiscoveredTarget,
    timeout: Duration,
    events: &EventSender,
) -> Result<RunSummary, Error> {
    events.emit(AppEvent::Test(TestEvent::TargetBuildStarted {
        target: target.name.clone(),
    }));

    let build_dir = project_dir.join(format!("build-{build_config}"));
    let build_start = Instant::now();
    let build_output = spawner
        .spawn_streaming(
            Spawn::new("cmake")
                .arg("--build")
                .arg(build_dir.display().to_string())
                .arg("--target")
                .arg(&target.name)
                .arg("--config")
                .arg(build_config)
                .cwd(project_dir.to_path_buf()),
            Box::new(|_| {}),
            Box::new(|_| {}),
            None,
        )
        .await?;

    events.emit(AppEvent::Test(TestEvent::TargetBuildCompleted {
        target: target.name.clone(),
        duration: build_start.elapsed(),
    }));

    if !build_output.success() {
        return Err(RunnerError::NoTargetsFound {
            path: target.source_dir.display().to_string(),
        }
        .into());
    }

    let framework = detect_target_framework(&target.source_dir);
    events.emit(AppEvent::Test(TestEvent::TargetRunStarted {
        target: target.name.clone(),
        framework: framework.as_str().to_string(),
    }));

    let binary_path = build_dir.join("bin").join(build_config).join(&target.name);
    let run_start = Instant::now();
    let spawn = Spawn::new(binary_path.display().to_string())
        .args(framework.run_args())
        .cwd(project_dir.to_path_buf())
        .timeout(timeout);

    let mut summary = RunSummary::default();
    let run_result = spawner.spawn_streaming(spawn, Box::new(|_| {}), Box::new(|_| {}), None).await;

    let output = match run_result {
        Ok(output) => output,
        Err(Error::Driver(cforge_errors::DriverError::Timeout { seconds, .. })) => {
            events.emit(AppEvent::Test(TestEvent::TargetTimeout {
                target: target.name.clone(),
                seconds,
            }));
            summary.record(TestStatus::Timeout);
            events.emit(AppEvent::Test(TestEvent::TargetRunCompleted {
                target: target.name.clone(),
                passed: 0,
                failed: 0,
                skipped: 0,
                duration: run_start.elapsed(),
            }));
            return Ok(summary);
        }
        Err(other) => return Err(other),
    };

    let cases = framework::parse_output(framework, &output.combined_output());
    if cases.is_empty() {
        let status = if output.success() { TestStatus::Passed } else { TestStatus::Failed };
        emit_case(events, &target.name, None, &target.name, status, output.duration, None);
        summary.record(status);
    } else {
        for case in &cases {
            emit_case(
                events,
                &target.name,
                case.suite.clone(),
                &case.name,
                case.status,
                case.duration,
                case.message.clone(),
            );
            summary.record(case.status);
        }
    }

    events.emit(AppEvent::Test(TestEvent::TargetRunCompleted {
        target: target.name.clone(),
        passed: summary.passed,
        failed: summary.failed,
        skipped: summary.skipped,
        duration: run_start.elapsed(),
    }));

    Ok(summary)
}

fn emit_case(
    events: &EventSender,
    target: &str,
    suite: Option<String>,
    name: &str,
    status: TestStatus,
    duration: Duration,
    message: Option<String>,
) {
    events.emit(AppEvent::Test(TestEvent::CaseResult {
        target: target.to_string(),
        suite,
        name: name.to_string(),
        status,
        duration,
        message,
    }));
}

fn detect_target_framework(source_dir: &Path) -> TestFramework {
    let Ok(entries) = std::fs::read_dir(source_dir) else {
        return TestFramework::Raw;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()).is_some_and(|ext| {
            matches!(ext, "c" | "cc" | "cpp" | "cxx" | "h" | "hpp")
        }) {
            if let Ok(content) = std::fs::read_to_string(&path) {
                let detected = framework::detect_from_source(&content);
                if detected != TestFramework::Raw {
                    return detected;
                }
            }
        }
    }
    TestFramework::Raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cforge_process::{LineCallback, ProcessOutput};
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;
    use tokio_util::sync::CancellationToken;

    struct FakeSpawner;

    #[async_trait]
    impl ProcessSpawn for FakeSpawner {
        async fn spawn_streaming(
            &self,
            spawn: Spawn,
            _on_stdout_line: LineCallback<'_>,
            _on_stderr_line: LineCallback<'_>,
            _cancel: Option<&CancellationToken>,
        ) -> Result<ProcessOutput, Error> {
            Ok(ProcessOutput {
                status: ExitStatus::from_raw(0),
                stdout: format!("ran {}", spawn.program),
                stderr: String::new(),
                duration: Duration::from_millis(5),
            })
        }
    }

    #[tokio::test]
    async fn no_targets_found_is_an_error() {
        let spawner = FakeSpawner;
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx): (EventSender, _) = cforge_events::channel();
        let err = run_all(
            &spawner,
            dir.path(),
            "Debug",
            &dir.path().join("tests"),
            Duration::from_secs(5),
            "demo",
            &tx,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Runner(RunnerError::NoTargetsFound { .. })));
    }

    #[tokio::test]
    async fn raw_target_with_successful_exit_counts_as_passed() {
        let dir = tempfile::tempdir().unwrap();
        let tests_dir = dir.path().join("tests");
        std::fs::create_dir_all(tests_dir.join("smoke")).unwrap();
        std::fs::write(tests_dir.join("smoke").join("main.cpp"), "int main(){return 0;}").unwrap();

        let spawner = FakeSpawner;
        let (tx, _rx): (EventSender, _) = cforge_events::channel();
        let summary = run_all(
            &spawner,
            dir.path(),
            "Debug",
            &tests_dir,
            Duration::from_secs(5),
            "demo",
            &tx,
        )
        .await
        .unwrap();
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 0);
    }
}
