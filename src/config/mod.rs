//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{CohortKey, DEFAULT_QUEUE};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Which cohort to aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortConfig {
    /// Game version, e.g. "15.20"
    #[serde(default = "default_patch")]
    pub patch: String,

    /// Queue label
    #[serde(default = "default_queue_type")]
    pub queue_type: String,
}

fn default_patch() -> String {
    "15.20".to_string()
}

fn default_queue_type() -> String {
    DEFAULT_QUEUE.to_string()
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            patch: default_patch(),
            queue_type: default_queue_type(),
        }
    }
}

impl CohortConfig {
    pub fn key(&self) -> CohortKey {
        CohortKey::new(self.patch.clone(), self.queue_type.clone())
    }
}

/// Record source tolerance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Share of unreadable match files above which the load is logged as an
    /// error rather than a warning (0.0 to 1.0)
    #[serde(default = "default_failure_warn_ratio")]
    pub failure_warn_ratio: f64,

    /// Individual load failures logged before only the total is reported
    #[serde(default = "default_max_logged_failures")]
    pub max_logged_failures: usize,
}

fn default_failure_warn_ratio() -> f64 {
    0.05
}

fn default_max_logged_failures() -> usize {
    5
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            failure_warn_ratio: default_failure_warn_ratio(),
            max_logged_failures: default_max_logged_failures(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Also export the champion table as Parquet
    #[serde(default = "default_true")]
    pub write_parquet: bool,

    /// Pretty-print JSON artifacts
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            write_parquet: default_true(),
            pretty_json: default_true(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub cohort: CohortConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            cohort: CohortConfig::default(),
            source: SourceConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &PathBuf) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cohort.patch.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Cohort patch must not be empty".to_string(),
            ));
        }

        if self.cohort.queue_type.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Cohort queue type must not be empty".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.source.failure_warn_ratio) {
            return Err(ConfigError::ValidationError(
                "Source failure_warn_ratio must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }
}
