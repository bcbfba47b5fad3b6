//! Error types for logger construction

use contextlog_domain::ParseLevelError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for logger construction
pub type Result<T> = std::result::Result<T, LoggerError>;

/// Configuration errors that prevent a logger from being built
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("shutdown channel is required")]
    MissingShutdownChannel,

    #[error("error parse level value '{level}': {source}")]
    InvalidLevel {
        level: String,
        #[source]
        source: ParseLevelError,
    },

    #[error("error open file path '{}': {source}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
