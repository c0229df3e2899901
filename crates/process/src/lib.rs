#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Shared subprocess utility (component O).
//!
//! Every component that shells out — the Dependency Resolver (git), the
//! Build Driver (cmake/ninja/make/msbuild), and the Test/Benchmark Runner
//! (built test binaries) — goes through [`Spawner`] so timeout, streaming,
//! and cancellation semantics live in exactly one place (§9).

use async_trait::async_trait;
use cforge_errors::{DriverError, Error};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Captured result of a spawned process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ProcessOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }

    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }

    #[must_use]
    pub fn combined_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// A single command to run.
#[derive(Debug, Clone)]
pub struct Spawn {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

impl Spawn {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: HashMap::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Line-oriented callback invoked for each stdout/stderr line as it arrives.
pub type LineCallback<'a> = Box<dyn FnMut(&str) + Send + 'a>;

/// Abstraction over "run a process" so Build Driver and Dependency Resolver
/// unit tests can substitute a fake that records calls and returns canned
/// output, never invoking a real `cmake`/`git` (§1.1 Test tooling, §8).
#[async_trait]
pub trait ProcessSpawn: Send + Sync {
    async fn spawn_streaming(
        &self,
        spawn: Spawn,
        on_stdout_line: LineCallback<'_>,
        on_stderr_line: LineCallback<'_>,
        cancel: Option<&CancellationToken>,
    ) -> Result<ProcessOutput, Error>;
}

/// Production [`ProcessSpawn`] implementation backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spawner;

#[async_trait]
impl ProcessSpawn for Spawner {
    async fn spawn_streaming(
        &self,
        spawn: Spawn,
        mut on_stdout_line: LineCallback<'_>,
        mut on_stderr_line: LineCallback<'_>,
        cancel: Option<&CancellationToken>,
    ) -> Result<ProcessOutput, Error> {
        let start = Instant::now();
        let mut cmd = Command::new(&spawn.program);
        cmd.args(&spawn.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &spawn.cwd {
            cmd.current_dir(dir);
        }
        for (k, v) in &spawn.env {
            cmd.env(k, v);
        }

        let mut child = cmd.spawn().map_err(|e| DriverError::SpawnFailed {
            program: spawn.program.clone(),
            message: e.to_string(),
        })?;

        let stdout = child.stdout.take().expect("piped stdout");
        let stderr = child.stderr.take().expect("piped stderr");
        let mut stdout_lines = BufReader::new(stdout).lines();
        let mut stderr_lines = BufReader::new(stderr).lines();

        let mut collected_stdout = String::new();
        let mut collected_stderr = String::new();

        let body = async {
            loop {
                tokio::select! {
                    line = stdout_lines.next_line() => {
                        match line {
                            Ok(Some(line)) => {
                                on_stdout_line(&line);
                                collected_stdout.push_str(&line);
                                collected_stdout.push('\n');
                            }
                            Ok(None) => break,
                            Err(_) => break,
                        }
                    }
                    line = stderr_lines.next_line() => {
                        match line {
                            Ok(Some(line)) => {
                                on_stderr_line(&line);
                                collected_stderr.push_str(&line);
                                collected_stderr.push('\n');
                            }
                            Ok(None) => {}
                            Err(_) => {}
                        }
                    }
                }
                if child
                    .try_wait()
                    .ok()
                    .flatten()
                    .is_some()
                {
                    break;
                }
            }
            child.wait().await
        };

        let status = match (spawn.timeout, cancel) {
            (Some(timeout), Some(token)) => {
                tokio::select! {
                    res = tokio::time::timeout(timeout, body) => {
                        match res {
                            Ok(status) => status,
                            Err(_) => {
                                let _ = child.start_kill();
                                return Err(DriverError::Timeout {
                                    program: spawn.program.clone(),
                                    seconds: timeout.as_secs(),
                                }.into());
                            }
                        }
                    }
                    () = token.cancelled() => {
                        let _ = child.start_kill();
                        return Err(DriverError::Cancelled { program: spawn.program.clone() }.into());
                    }
                }
            }
            (Some(timeout), None) => match tokio::time::timeout(timeout, body).await {
                Ok(status) => status,
                Err(_) => {
                    let _ = child.start_kill();
                    return Err(DriverError::Timeout {
                        program: spawn.program.clone(),
                        seconds: timeout.as_secs(),
                    }
                    .into());
                }
            },
            (None, Some(token)) => {
                tokio::select! {
                    status = body => status,
                    () = token.cancelled() => {
                        let _ = child.start_kill();
                        return Err(DriverError::Cancelled { program: spawn.program.clone() }.into());
                    }
                }
            }
            (None, None) => body.await,
        };

        let status = status.map_err(|e| DriverError::SpawnFailed {
            program: spawn.program.clone(),
            message: e.to_string(),
        })?;

        Ok(ProcessOutput {
            status,
            stdout: collected_stdout,
            stderr: collected_stderr,
            duration: start.elapsed(),
        })
    }
}

/// Convenience wrapper for callers that don't need per-line callbacks.
pub async fn run(spawner: &dyn ProcessSpawn, spawn: Spawn) -> Result<ProcessOutput, Error> {
    spawner
        .spawn_streaming(spawn, Box::new(|_| {}), Box::new(|_| {}), None)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let spawner = Spawner;
        let out = run(&spawner, Spawn::new("echo").arg("hello"))
            .await
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn nonzero_exit_is_not_an_error() {
        let spawner = Spawner;
        let out = run(&spawner, Spawn::new("sh").arg("-c").arg("exit 7"))
            .await
            .unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code(), Some(7));
    }

    #[tokio::test]
    async fn timeout_kills_child_and_surfaces_error() {
        let spawner = Spawner;
        let spawn = Spawn::new("sleep")
            .arg("5")
            .timeout(Duration::from_millis(50));
        let err = run(&spawner, spawn).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Driver(DriverError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn cancellation_kills_child() {
        let spawner = Spawner;
        let token = CancellationToken::new();
        let token2 = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token2.cancel();
        });
        let spawn = Spawn::new("sleep").arg("5");
        let err = spawner
            .spawn_streaming(spawn, Box::new(|_| {}), Box::new(|_| {}), Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn line_callbacks_see_each_line() {
        let spawner = Spawner;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = Arc::clone(&seen);
        let spawn = Spawn::new("sh").arg("-c").arg("printf 'a\\nb\\n'");
        spawner
            .spawn_streaming(
                spawn,
                Box::new(move |line| seen2.lock().unwrap().push(line.to_string())),
                Box::new(|_| {}),
                None,
            )
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
