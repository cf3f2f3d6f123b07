use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{Units, error::WeatherError, provider::{API_KEY_ENV, DEFAULT_TIMEOUT}};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// units = "imperial"
/// timeout_secs = 10
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// OpenWeatherMap API key, used when neither `--api-key` nor the
    /// environment variable provide one.
    pub api_key: Option<String>,

    /// Units used when `--units` is not given.
    pub units: Option<Units>,

    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-report", "weather-report")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Pick the API key: command line first, then the environment value,
    /// then the config file. Blank values count as absent.
    pub fn resolve_api_key(
        &self,
        cli_key: Option<&str>,
        env_key: Option<&str>,
    ) -> Result<String, WeatherError> {
        [cli_key, env_key, self.api_key.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                WeatherError::Configuration(format!(
                    "OpenWeather API key not provided. Set {API_KEY_ENV} or use --api-key.\n\
                     Hint: run `weather-report configure` to store a key."
                ))
            })
    }

    /// Units from the command line, falling back to the configured default.
    pub fn units_or_default(&self, cli_units: Option<Units>) -> Units {
        cli_units.or(self.units).unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs.map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }
}
