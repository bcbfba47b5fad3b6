//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.

use contextlog_domain::Level;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("logger.level cannot be empty")]
    EmptyLevel,

    #[error("logger.outputs cannot contain an empty path")]
    EmptyOutputPath,

    #[error("logger.level '{0}' is not one of debug, info, warning, error, fatal, panic")]
    InvalidLevel(String),
}

/// `[logger]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Threshold level name
    pub level: String,
    /// Files records are appended to, in addition to standard error
    pub outputs: Vec<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::default().to_string(),
            outputs: Vec::new(),
        }
    }
}

/// Complete configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub logger: LoggerConfig,
}

impl FileConfig {
    /// Check values serde cannot reject on its own
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let level = self.logger.level.trim();
        if level.is_empty() {
            return Err(ConfigValidationError::EmptyLevel);
        }
        if level.parse::<Level>().is_err() {
            return Err(ConfigValidationError::InvalidLevel(level.to_string()));
        }
        if self.logger.outputs.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigValidationError::EmptyOutputPath);
        }
        Ok(())
    }
}
