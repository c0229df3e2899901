#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Global tool configuration for cforge.
//!
//! This is distinct from a project's `cforge.toml` manifest: it holds
//! machine-local defaults — preferred generator, parallel job count, color
//! mode, the registry index URL, the default `dependencies.directory` for
//! new projects — loaded from `~/.config/cforge/config.toml` via the same
//! base → env-var → CLI-flag precedence chain the manifest's overlays use.

pub mod constants;
pub mod core;

pub use core::{GeneralConfig, NetworkConfig, PathConfig};

use cforge_errors::{ConfigError, Error};
use cforge_types::{ColorChoice, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The full contents of `~/.config/cforge/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

impl Config {
    /// Resolve the default config file path (`~/.config/cforge/config.toml`).
    ///
    /// # Errors
    /// Returns [`ConfigError::NotFound`] if the home directory cannot be
    /// determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let home = dirs::home_dir().ok_or_else(|| ConfigError::NotFound {
            path: "home directory".to_string(),
        })?;
        Ok(home
            .join(".config")
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::CONFIG_FILE_NAME))
    }

    /// Resolve the directory holding cforge's own state (config, registry
    /// cache), honoring [`PathConfig::config_dir`] if set.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotFound`] if the home directory cannot be
    /// determined and no override is configured.
    pub fn config_dir(&self) -> Result<PathBuf, Error> {
        if let Some(dir) = &self.paths.config_dir {
            return Ok(dir.clone());
        }
        let home = dirs::home_dir().ok_or_else(|| ConfigError::NotFound {
            path: "home directory".to_string(),
        })?;
        Ok(home.join(".config").join(constants::CONFIG_DIR_NAME))
    }

    /// Load configuration from an explicit file.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotFound`] if the file cannot be read, or
    /// [`ConfigError::ParseError`] if it is not valid TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;
        toml::from_str(&contents)
            .map_err(|e| {
                ConfigError::ParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
                .into()
            })
    }

    /// Load configuration from the default path, falling back to defaults
    /// (and persisting them) when no file exists yet.
    ///
    /// # Errors
    /// Returns [`ConfigError::ParseError`] if an existing file is malformed.
    pub async fn load() -> Result<Self, Error> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path).await
        } else {
            let config = Self::default();
            if let Err(e) = config.save().await {
                tracing::warn!("failed to persist default cforge config: {e}");
            }
            Ok(config)
        }
    }

    /// Load from an explicit path if given, else the default location.
    ///
    /// # Errors
    /// See [`Config::load`] / [`Config::load_from_file`].
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(p) => Self::load_from_file(p).await,
            None => Self::load().await,
        }
    }

    /// Merge `CFORGE_*` environment variables over the loaded configuration,
    /// matching the CLI's `env` feature.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] if a recognized variable holds
    /// an unparsable value.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(output) = std::env::var("CFORGE_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "CFORGE_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        if let Ok(color) = std::env::var("CFORGE_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "CFORGE_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        if let Ok(jobs) = std::env::var("CFORGE_JOBS") {
            self.general.jobs = jobs.parse().map_err(|_| ConfigError::InvalidValue {
                field: "CFORGE_JOBS".to_string(),
                value: jobs,
            })?;
        }

        if let Ok(generator) = std::env::var("CMAKE_GENERATOR") {
            self.general.preferred_generator = generator;
        }

        if let Ok(url) = std::env::var("CFORGE_REGISTRY_INDEX") {
            self.network.registry_index_url = url;
        }

        Ok(())
    }

    /// Persist configuration to the default location.
    ///
    /// # Errors
    /// Returns [`ConfigError::WriteError`] if the file cannot be written.
    pub async fn save(&self) -> Result<(), Error> {
        let path = Self::default_path()?;
        self.save_to(&path).await
    }

    /// Persist configuration to an explicit path.
    ///
    /// # Errors
    /// Returns [`ConfigError::WriteError`] if the file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError {
                    path: parent.display().to_string(),
                    error: e.to_string(),
                })?;
        }
        let rendered = toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })?;
        let content = format!(
            "# cforge global configuration\n\
             # Generated automatically; edit freely.\n\n\
             {rendered}"
        );
        tokio::fs::write(path, content)
            .await
            .map_err(|e| ConfigError::WriteError {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;
        Ok(())
    }

    /// Resolve the job count to pass to `--parallel`: an explicit CLI value
    /// wins, then the configured default, then CPU auto-detection.
    #[must_use]
    pub fn resolve_jobs(&self, cli_jobs: Option<usize>) -> usize {
        cli_jobs.unwrap_or_else(|| calculate_build_jobs(self.general.jobs))
    }
}

/// Auto-detect a sensible parallel job count from the CPU count when
/// `config_value` is `0` (no explicit override).
#[must_use]
pub fn calculate_build_jobs(config_value: usize) -> usize {
    if config_value > 0 {
        config_value
    } else {
        num_cpus::get().max(1)
    }
}
