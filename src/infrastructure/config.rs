//! Configuration infrastructure
//!
//! Configuration lives in a single JSON file under the user config directory.
//! Every field has a default, so a partial file is valid, and any field can be
//! overridden from the environment:
//!
//! ```bash
//! PRICE_TRACKER_LOGGING__LEVEL=debug price-tracker
//! PRICE_TRACKER_LEDGER__DATA_DIR=/srv/prices price-tracker
//! ```

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where ledger tables are stored
    pub ledger: LedgerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Scraped listing input
    pub ingest: IngestConfig,
}

/// Ledger storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Directory holding one `<store>_prices.csv` per store
    pub data_dir: PathBuf,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Name of the active log file inside the log directory
    pub file_name: String,

    /// Number of rotated log files to keep (older files will be deleted)
    pub max_files: u32,

    /// Enable automatic log cleanup on startup
    pub auto_cleanup_logs: bool,

    /// Module-specific log level filters (e.g., "price_tracker_lib::domain": "debug")
    pub module_filters: HashMap<String, String>,
}

/// Scraped listing input settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// JSON array of scraped listings with their raw price text
    pub feed_path: PathBuf,
}

/// Default configuration values
pub mod defaults {
    /// Application directory name under the platform config/data dirs
    pub const APP_DIR_NAME: &str = "price-tracker";

    /// Configuration file name
    pub const CONFIG_FILE_NAME: &str = "config.json";

    /// Ledger directory name under the application data dir
    pub const LEDGER_DIR_NAME: &str = "ledgers";

    /// Default feed file name under the application data dir
    pub const FEED_FILE_NAME: &str = "feed.json";

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default log file name
    pub const LOG_FILE_NAME: &str = "price-tracker.log";

    /// Default number of rotated log files to keep
    pub const MAX_LOG_FILES: u32 = 7;

    /// Environment variable prefix for overrides
    pub const ENV_PREFIX: &str = "PRICE_TRACKER";

    /// Accepted log levels
    pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
}

/// Application data directory, falling back to the working directory
pub fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(defaults::APP_DIR_NAME)
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: app_data_dir().join(defaults::LEDGER_DIR_NAME),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: true,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            max_files: defaults::MAX_LOG_FILES,
            auto_cleanup_logs: true,
            module_filters: HashMap::new(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            feed_path: app_data_dir().join(defaults::FEED_FILE_NAME),
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    FileLoad {
        #[from]
        source: config::ConfigError,
    },

    #[error("Failed to write configuration to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl AppConfig {
    /// Check the settings the binary cannot run without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation("ledger.data_dir must not be empty"));
        }
        if self.ingest.feed_path.as_os_str().is_empty() {
            return Err(ConfigError::validation("ingest.feed_path must not be empty"));
        }

        let level = self.logging.level.to_lowercase();
        if !defaults::LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(format!(
                "logging.level '{}' is not one of {:?}",
                self.logging.level,
                defaults::LOG_LEVELS
            )));
        }
        if !self.logging.console_output && !self.logging.file_output {
            return Err(ConfigError::validation(
                "at least one of logging.console_output or logging.file_output must be enabled",
            ));
        }
        if self.logging.file_output && self.logging.file_name.trim().is_empty() {
            return Err(ConfigError::validation("logging.file_name must not be empty"));
        }

        Ok(())
    }

    /// Directory for log files, next to the ledger directory
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.ledger
            .data_dir
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(self.ledger.data_dir.as_path())
            .join("logs")
    }
}

/// Configuration manager for loading and saving settings
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Create a configuration manager for the user config directory
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::with_path(config_dir.join(defaults::CONFIG_FILE_NAME)))
    }

    /// Create a configuration manager for an explicit file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from file and environment, creating a default file on first run
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        self.load_with_env(
            config::Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Load with an explicit environment source
    pub fn load_with_env(&self, env: config::Environment) -> Result<AppConfig, ConfigError> {
        if !self.config_path.exists() {
            info!(
                "🎉 First run detected - creating default configuration: {:?}",
                self.config_path
            );
            self.save_config(&AppConfig::default())?;
        }

        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from(self.config_path.as_path()).required(true))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    /// Save configuration to file as pretty JSON
    pub fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: self.config_path.clone(),
            source,
        };

        if let Some(config_dir) = self.config_path.parent() {
            std::fs::create_dir_all(config_dir).map_err(write_error)?;
        }

        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content).map_err(write_error)?;

        info!("✅ Configuration saved to: {:?}", self.config_path);
        Ok(())
    }
}
