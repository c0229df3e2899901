//! Tool-level configuration sections merged into [`crate::Config`] (§6:
//! `~/.config/cforge/config.toml`, distinct from a project's `cforge.toml`).

use cforge_types::{ColorChoice, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General defaults consulted before CLI flags/env vars in the base → env →
/// flag precedence chain (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
    /// Default `-j/--jobs` when the flag is omitted. `0` means auto-detect
    /// from CPU count (see [`crate::calculate_build_jobs`]).
    #[serde(default)]
    pub jobs: usize,
    /// Preferred CMake generator name, or empty to auto-detect (Ninja
    /// Multi-Config when found on PATH, else the platform default; §4.12).
    #[serde(default)]
    pub preferred_generator: String,
    /// Default `dependencies.directory` for new projects (§9 Open Question).
    #[serde(default = "default_dependencies_directory")]
    pub dependencies_directory: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
            jobs: 0,
            preferred_generator: String::new(),
            dependencies_directory: default_dependencies_directory(),
        }
    }
}

/// Registry Client network defaults (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_registry_index_url")]
    pub registry_index_url: String,
    /// How long a cached registry entry is trusted before a refresh is
    /// attempted.
    #[serde(default = "default_index_max_age_days")]
    pub index_max_age_days: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            registry_index_url: default_registry_index_url(),
            index_max_age_days: default_index_max_age_days(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
        }
    }
}

/// Overridable filesystem paths.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub config_dir: Option<PathBuf>,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_dependencies_directory() -> String {
    crate::constants::DEFAULT_DEPENDENCIES_DIRECTORY.to_string()
}

fn default_registry_index_url() -> String {
    "https://registry.cforge.dev/index".to_string()
}

fn default_index_max_age_days() -> u32 {
    7
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}
