use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::sampler::{DEFAULT_MAX_CONSECUTIVE_FAILURES, SamplerSettings, SettingsError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub sampler: SamplerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub interval_secs: f64,
    /// `None` monitors until interrupted.
    pub duration_secs: Option<f64>,
    pub format: OutputFormat,
    pub disk_mount: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            interval_secs: 3.0,
            duration_secs: Some(30.0),
            format: OutputFormat::Text,
            disk_mount: PathBuf::from("/"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub max_consecutive_failures: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn sampler_settings(&self) -> Result<SamplerSettings, SettingsError> {
        Ok(
            SamplerSettings::new(self.general.interval_secs, self.general.duration_secs)?
                .with_max_consecutive_failures(self.sampler.max_consecutive_failures),
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hwmon").join("config.toml"))
}

/// Load `path`, or the default location when `None`. A missing default file
/// is not an error.
pub fn try_load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
}

/// Like [`try_load_config`], but falls back to defaults. The error is handed
/// back so it can be logged once the subscriber is installed.
pub fn load_config(path: Option<&Path>) -> (Config, Option<ConfigError>) {
    match try_load_config(path) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    }
}
