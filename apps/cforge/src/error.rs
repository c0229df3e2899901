//! CLI error handling.

use std::fmt;

/// CLI-specific error type wrapping every domain error plus argument and
/// I/O failures that never reach the core pipeline.
#[derive(Debug)]
pub enum CliError {
    Core(cforge_errors::Error),
    InvalidArguments(String),
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Core(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Core(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::InvalidArguments(_) => None,
        }
    }
}

impl From<cforge_errors::Error> for CliError {
    fn from(e: cforge_errors::Error) -> Self {
        CliError::Core(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl CliError {
    /// Exit code: `0` success, `1` user-visible failure, `2` usage error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArguments(_) => 2,
            CliError::Core(_) | CliError::Io(_) => 1,
        }
    }

    /// An actionable hint for domain errors that carry one.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        use cforge_errors::UserFacingError;
        match self {
            CliError::Core(cforge_errors::Error::Manifest(e)) => e.user_hint(),
            CliError::Core(cforge_errors::Error::Config(e)) => e.user_hint(),
            CliError::Core(cforge_errors::Error::Version(e)) => e.user_hint(),
            CliError::Core(cforge_errors::Error::Registry(e)) => e.user_hint(),
            CliError::Core(cforge_errors::Error::Resolver(e)) => e.user_hint(),
            CliError::Core(cforge_errors::Error::Emitter(e)) => e.user_hint(),
            CliError::Core(cforge_errors::Error::Workspace(e)) => e.user_hint(),
            CliError::Core(cforge_errors::Error::Analyzer(e)) => e.user_hint(),
            CliError::Core(cforge_errors::Error::Driver(e)) => e.user_hint(),
            CliError::Core(cforge_errors::Error::Runner(e)) => e.user_hint(),
            CliError::Core(cforge_errors::Error::Hash(e)) => e.user_hint(),
            _ => None,
        }
    }
}
