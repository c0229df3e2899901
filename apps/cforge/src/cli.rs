//! Command line interface definition.

use clap::{Parser, Subcommand};
use cforge_types::ColorChoice;
use std::path::PathBuf;

/// cforge - a declarative CMake build orchestrator.
#[derive(Parser)]
#[command(name = "cforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Declarative CMake build orchestrator for C/C++ projects")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for every command.
#[derive(Parser, Debug, Clone)]
pub struct GlobalArgs {
    /// Build configuration (Debug, Release, RelWithDebInfo, MinSizeRel, or
    /// any user-defined value).
    #[arg(short = 'c', long = "config", global = true, default_value = "Debug")]
    pub build_config: String,

    /// Verbose diagnostics (dropped-overlay notes, unknown-key warnings).
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Parallel job count (0 = auto-detect from CPU count).
    #[arg(short = 'j', long, global = true, default_value_t = 0)]
    pub jobs: usize,

    /// Select a member project inside a workspace.
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Color output control.
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a new cforge project in the current (or given) directory.
    Init {
        /// Project name (defaults to the directory name).
        name: Option<String>,
        /// Directory to scaffold into (defaults to the current directory).
        #[arg(long)]
        path: Option<PathBuf>,
        /// Output kind for the scaffolded project.
        #[arg(long, default_value = "executable")]
        kind: String,
    },

    /// Resolve dependencies, emit CMakeLists.txt, configure, and build.
    Build {
        /// Explicit generator override (auto-detected otherwise).
        #[arg(long)]
        generator: Option<String>,
        /// Continue building remaining workspace members after a failure.
        #[arg(long)]
        keep_going: bool,
    },

    /// Build, then invoke the produced executable.
    Run {
        /// Arguments forwarded to the executable.
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Build and run the project's test targets.
    Test {
        /// Only run targets whose name contains this substring.
        #[arg(long)]
        filter: Option<String>,
        /// Per-target timeout in seconds.
        #[arg(long, default_value_t = 120)]
        timeout: u64,
    },

    /// Build and run the project's benchmark targets.
    Bench {
        #[arg(long)]
        filter: Option<String>,
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },

    /// Remove generated build directories and caches.
    Clean {
        /// Also remove the hash cache and dependency materializations.
        #[arg(long)]
        all: bool,
    },

    /// Package the build output via CPack.
    Package,

    /// Show resolved dependency status.
    Deps,

    /// Inspect or refresh the lock file.
    Lock {
        /// Verify the on-disk materialization matches the lock file.
        #[arg(long)]
        verify: bool,
        /// Remove the lock file and dependency materializations.
        #[arg(long)]
        clean: bool,
        /// Force re-resolution, ignoring the existing lock file.
        #[arg(long)]
        force: bool,
    },

    /// Build, then run the CMake install step.
    Install,

    /// Re-resolve dependencies against current manifest constraints.
    Update,

    /// Add a dependency to the manifest.
    Add {
        /// `name`, `name@version`, or `git:name=url#ref`.
        spec: String,
    },

    /// Remove a dependency from the manifest.
    Remove {
        /// Dependency name.
        name: String,
    },

    /// Generate IDE integration files (`compile_commands.json`).
    Ide,

    /// List workspace members, or this project's declared dependencies.
    List,

    /// Detect `#include` cycles under the project.
    Circular {
        /// Also scan materialized dependency directories.
        #[arg(long)]
        include_deps: bool,
        /// Scan every workspace member instead of the current project.
        #[arg(long)]
        workspace: bool,
        /// Emit JSON instead of a tree.
        #[arg(long)]
        json: bool,
        /// Cap the number of reported chains.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the tool version.
    Version,
}
