//! `duckfuzz` Configuration Module
//!
//! Provides configuration file support via `duckfuzz.toml` and environment
//! variables.
//!
//! # Priority (highest to lowest)
//!
//! 1. Environment variables (`DUCKFUZZ_*`, sections split on `__`)
//! 2. Configuration file (`duckfuzz.toml`)
//! 3. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::layout::{STORAGE_VERSION, WAL_SIZE_FIELD_LIMIT, WAL_SIZE_LIMIT_MAX};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "duckfuzz.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

/// Corpus builder configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Data files larger than this many bytes are not prepended.
    pub max_data_file_size: u64,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            max_data_file_size: 5000,
        }
    }
}

/// Repair engine configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Declared WAL entry sizes above this that overrun the file are shrunk.
    pub wal_size_limit: u64,
    /// Storage version written into the main database header.
    pub storage_version: u64,
    /// Write the `FUZZ` marker after the storage version.
    pub debug_marker: bool,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            wal_size_limit: WAL_SIZE_FIELD_LIMIT,
            storage_version: STORAGE_VERSION,
            debug_marker: true,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
    /// Log format: text or json.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Main `duckfuzz` configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DuckfuzzConfig {
    /// Corpus builder configuration.
    pub corpus: CorpusConfig,
    /// Repair engine configuration.
    pub repair: RepairConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl DuckfuzzConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < file < environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(CONFIG_FILE_NAME)
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("DUCKFUZZ_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.corpus.max_data_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "corpus.max_data_file_size".to_string(),
                message: "value must be > 0".to_string(),
            });
        }

        if self.repair.wal_size_limit == 0 || self.repair.wal_size_limit > WAL_SIZE_LIMIT_MAX {
            return Err(ConfigError::InvalidValue {
                key: "repair.wal_size_limit".to_string(),
                message: format!("value must be between 1 and {WAL_SIZE_LIMIT_MAX}"),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        Ok(())
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
