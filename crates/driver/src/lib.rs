#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Build Driver (component L): generator selection, CMake configure, and
//! CMake build invocation, streamed through the Process Spawner (component
//! O) with generator-aware progress parsing.

pub mod generator;
pub mod progress;

use cforge_errors::{DriverError, Error};
use cforge_events::{
    AppEvent, BuildEvent, ConfigureEvent, EventEmitter, EventSender, FailureContext, Generator,
};
use cforge_process::{ProcessSpawn, Spawn};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// One configure+build invocation's tunables (§4.12, §6 global flags).
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub build_config: String,
    pub jobs: usize,
    pub timeout: Option<Duration>,
}

/// Run `cmake -S . -B build -G <generator>` for `project_dir`.
///
/// # Errors
/// Returns [`DriverError::ConfigureFailed`] if CMake exits nonzero.
pub async fn configure(
    spawner: &dyn ProcessSpawn,
    project_dir: &Path,
    project: &str,
    generator: Generator,
    build_config: &str,
    extra_cache_args: &[String],
    events: &EventSender,
) -> Result<(), Error> {
    events.emit(AppEvent::Configure(ConfigureEvent::Started {
        project: project.to_string(),
        generator,
        build_config: build_config.to_string(),
    }));

    let build_dir = project_dir.join(format!("build-{build_config}"));
    let spawn = Spawn::new("cmake")
        .arg("-S")
        .arg(".")
        .arg("-B")
        .arg(build_dir.display().to_string())
        .arg("-G")
        .arg(generator::generator_cmake_name(generator))
        .args(extra_cache_args.iter().cloned())
        .cwd(project_dir.to_path_buf());

    let project_owned = project.to_string();
    let events_for_lines = events.clone();
    let on_line = move |line: &str| {
        events_for_lines.emit(AppEvent::Configure(ConfigureEvent::OutputLine {
            project: project_owned.clone(),
            line: line.to_string(),
        }));
    };

    let start = Instant::now();
    let output = spawner
        .spawn_streaming(spawn, Box::new(on_line), Box::new(|_| {}), None)
        .await?;

    if !output.success() {
        let error: Error = DriverError::ConfigureFailed {
            exit_code: output.exit_code(),
            output: output.combined_output(),
        }
        .into();
        events.emit(AppEvent::Configure(ConfigureEvent::Failed {
            project: project.to_string(),
            failure: FailureContext::from(&error),
        }));
        return Err(error);
    }

    events.emit(AppEvent::Configure(ConfigureEvent::Completed {
        project: project.to_string(),
        duration: start.elapsed(),
    }));
    Ok(())
}

/// Run `cmake --build build-<cfg> --config <cfg> --parallel <jobs>`.
///
/// # Errors
/// Returns [`DriverError::BuildFailed`] if CMake exits nonzero.
pub async fn build(
    spawner: &dyn ProcessSpawn,
    project_dir: &Path,
    project: &str,
    options: &BuildOptions,
    events: &EventSender,
) -> Result<(), Error> {
    events.emit(AppEvent::Build(BuildEvent::Started {
        project: project.to_string(),
        build_config: options.build_config.clone(),
        jobs: options.jobs,
    }));

    let build_dir = project_dir.join(format!("build-{}", options.build_config));
    let mut spawn = Spawn::new("cmake")
        .arg("--build")
        .arg(build_dir.display().to_string())
        .arg("--config")
        .arg(&options.build_config)
        .arg("--parallel")
        .arg(options.jobs.to_string())
        .cwd(project_dir.to_path_buf());
    if let Some(timeout) = options.timeout {
        spawn = spawn.timeout(timeout);
    }

    let project_owned = project.to_string();
    let slowest: Arc<Mutex<Vec<(String, Duration)>>> = Arc::new(Mutex::new(Vec::new()));
    let last_file: Arc<Mutex<Option<(String, Instant)>>> = Arc::new(Mutex::new(None));

    let events_for_lines = events.clone();
    let slowest_for_cb = Arc::clone(&slowest);
    let last_file_for_cb = Arc::clone(&last_file);
    let on_line = move |line: &str| {
        if let Some(parsed) = progress::parse_progress_line(line) {
            let mut last = last_file_for_cb.lock().expect("lock poisoned");
            if let Some((previous_file, started_at)) = last.take() {
                slowest_for_cb
                    .lock()
                    .expect("lock poisoned")
                    .push((previous_file, started_at.elapsed()));
            }
            if let Some(file) = &parsed.current_file {
                *last = Some((file.clone(), Instant::now()));
            }
            events_for_lines.emit(AppEvent::Build(BuildEvent::Progress {
                project: project_owned.clone(),
                fraction: parsed.fraction,
                current_file: parsed.current_file,
            }));
        } else {
            events_for_lines.emit(AppEvent::Build(BuildEvent::OutputLine {
                project: project_owned.clone(),
                line: line.to_string(),
            }));
        }
    };

    let start = Instant::now();
    let output = spawner
        .spawn_streaming(spawn, Box::new(on_line), Box::new(|_| {}), None)
        .await?;

    if let Some((file, started_at)) = last_file.lock().expect("lock poisoned").take() {
        slowest.lock().expect("lock poisoned").push((file, started_at.elapsed()));
    }

    if !output.success() {
        let error: Error = DriverError::BuildFailed {
            exit_code: output.exit_code(),
            output: output.combined_output(),
        }
        .into();
        events.emit(AppEvent::Build(BuildEvent::Failed {
            project: project.to_string(),
            failure: FailureContext::from(&error),
        }));
        return Err(error);
    }

    let mut slowest_files = slowest.lock().expect("lock poisoned").clone();
    slowest_files.sort_by(|a, b| b.1.cmp(&a.1));
    slowest_files.truncate(10);

    for (file, duration) in &slowest_files {
        events.emit(AppEvent::Build(BuildEvent::FileCompiled {
            project: project.to_string(),
            file: file.clone(),
            duration: *duration,
        }));
    }

    events.emit(AppEvent::Build(BuildEvent::Completed {
        project: project.to_string(),
        duration: start.elapsed(),
        slowest_files,
    }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cforge_events::EventSender;
    use cforge_process::{LineCallback, ProcessOutput};
    use std::process::ExitStatus;
    use std::os::unix::process::ExitStatusExt;
    use tokio_util::sync::CancellationToken;

    struct FakeSpawner {
        exit_code: i32,
        lines: Vec<&'static str>,
    }

    #[async_trait]
    impl ProcessSpawn for FakeSpawner {
        async fn spawn_streaming(
            &self,
            _spawn: Spawn,
            mut on_stdout_line: LineCallback<'_>,
            _on_stderr_line: LineCallback<'_>,
            _cancel: Option<&CancellationToken>,
        ) -> Result<ProcessOutput, Error> {
            for line in &self.lines {
                on_stdout_line(line);
            }
            Ok(ProcessOutput {
                status: ExitStatus::from_raw(self.exit_code << 8),
                stdout: self.lines.join("\n"),
                stderr: String::new(),
                duration: Duration::from_millis(1),
            })
        }
    }

    #[tokio::test]
    async fn successful_configure_emits_completed() {
        let spawner = FakeSpawner { exit_code: 0, lines: vec!["-- Configuring done"] };
        let (tx, _rx): (EventSender, _) = cforge_events::channel();
        let dir = tempfile::tempdir().unwrap();
        configure(&spawner, dir.path(), "demo", Generator::UnixMakefiles, "Debug", &[], &tx)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_configure_surfaces_configure_failed() {
        let spawner = FakeSpawner { exit_code: 1, lines: vec!["error: bad manifest"] };
        let (tx, _rx): (EventSender, _) = cforge_events::channel();
        let dir = tempfile::tempdir().unwrap();
        let err = configure(&spawner, dir.path(), "demo", Generator::UnixMakefiles, "Debug", &[], &tx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::ConfigureFailed { .. })));
    }

    #[tokio::test]
    async fn build_tracks_slowest_files_from_ninja_progress() {
        let spawner = FakeSpawner {
            exit_code: 0,
            lines: vec!["[1/2] Building CXX object a.cpp.o", "[2/2] Building CXX object b.cpp.o"],
        };
        let (tx, _rx): (EventSender, _) = cforge_events::channel();
        let dir = tempfile::tempdir().unwrap();
        let options = BuildOptions { build_config: "Debug".to_string(), jobs: 4, timeout: None };
        build(&spawner, dir.path(), "demo", &options, &tx).await.unwrap();
    }
}
