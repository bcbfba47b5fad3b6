//! CLI argument definitions

use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;

/// CLI arguments for contextlog
#[derive(Parser, Debug)]
#[command(name = "contextlog")]
#[command(author, version, about = "Pipe plain text through a structured JSON logger")]
#[command(long_about = r#"
contextlog reads standard input line by line and writes every line as a
JSON record to standard error and to any configured output files.

Configuration files are loaded from (in priority order):
1. --config <path>                      Explicit config file
2. CONTEXTLOG_LOGGER__LEVEL, ...        Environment variables
3. ./contextlog.toml                    Project-level config
4. ~/.config/contextlog/config.toml     Global config

Press Ctrl-C to stop gracefully.

Example:
  my-service 2>&1 | contextlog -o /var/log/my-service.json -f service=my-service
  tail -f build.log | contextlog --level warning -f attempt=3
"#)]
pub struct Cli {
    /// Threshold level (debug, info, warning, error, fatal, panic)
    #[arg(short, long, value_name = "LEVEL")]
    pub level: Option<String>,

    /// Append records to this file as well (can be specified multiple times)
    #[arg(short, long, value_name = "PATH")]
    pub output: Vec<PathBuf>,

    /// Field attached to every record, as key=value (can be specified multiple times)
    ///
    /// Values that parse as JSON keep their type; anything else is a string.
    #[arg(short, long, value_name = "KEY=VALUE", value_parser = parse_field)]
    pub field: Vec<(String, Value)>,

    /// Verbosity of contextlog's own diagnostics (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

/// Parse `key=value` into a field, reading the value as JSON when it is valid JSON
pub fn parse_field(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("field key cannot be empty in '{s}'"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}
