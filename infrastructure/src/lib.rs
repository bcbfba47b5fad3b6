//! Infrastructure layer for contextlog
//!
//! This crate contains the adapter implementing the logger ports defined
//! in the application layer, plus configuration file loading.

pub mod config;
pub mod logger;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig, LoggerConfig};
pub use logger::{
    ContextLogger, ContextLoggerBuilder, FieldKey, FieldMap, GELF_TIMESTAMP_FORMAT, JsonFormatter,
    LineWriter, LogEntry, LoggerError, LoggerLayer,
};
