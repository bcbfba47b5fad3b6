//! Configuration file loading for contextlog
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. `CONTEXTLOG_*` environment variables (`CONTEXTLOG_LOGGER__LEVEL=debug`)
//! 3. Project root: `./contextlog.toml` or `./.contextlog.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/contextlog/config.toml`
//! 5. Fallback: `~/.config/contextlog/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{ConfigValidationError, FileConfig, LoggerConfig};
pub use loader::ConfigLoader;
