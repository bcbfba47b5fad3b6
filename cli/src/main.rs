//! CLI entrypoint for contextlog
//!
//! This is the main binary that wires together all layers: it loads the
//! configuration, builds the logger and pipes standard input through it
//! until EOF or Ctrl-C.

mod cli;

use anyhow::{Result, anyhow};
use clap::Parser;
use cli::Cli;
use contextlog_application::{Context, Entry, EntryExt, shutdown_channel};
use contextlog_domain::Values;
use contextlog_infrastructure::{ConfigLoader, ContextLogger, FileConfig};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit status after a graceful shutdown triggered by Ctrl-C
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = load_config(&cli)?;
    debug!(?config, "configuration loaded");

    // === Dependency Injection ===
    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
    let logger = ContextLogger::from_config(&config.logger, shutdown_tx)?;
    info!(level = %logger.level(), outputs = config.logger.outputs.len(), "logger ready");

    let fields: Values = cli.field.into_iter().collect();
    let entry = logger.with_values(fields);
    let ctx = entry.new_context(&Context::current());

    // Stdin is read on a blocking thread; every line becomes one record
    let stdin_entry = Arc::clone(&entry);
    let mut copy = tokio::task::spawn_blocking(move || -> io::Result<u64> {
        let mut writer = stdin_entry.writer();
        let copied = io::copy(&mut io::stdin().lock(), &mut writer)?;
        writer.flush()?;
        Ok(copied)
    });

    let signal_entry = Arc::clone(&entry);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_entry.graceful_fatal(&ctx);
        }
    });

    tokio::select! {
        Some(ctx) = shutdown_rx.recv() => {
            let entry = entry.from_context(&ctx).unwrap_or_else(|| Arc::clone(&entry));
            entry.warning("interrupted, shutting down");
            // The blocking stdin reader cannot be cancelled, so leave without
            // waiting for the runtime to join it.
            entry.exit(INTERRUPTED_EXIT_CODE);
        }
        result = &mut copy => {
            let copied = result??;
            info!(bytes = copied, "standard input closed");
        }
    }

    Ok(())
}

/// Merge configuration sources, then apply command-line overrides
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = match (&cli.config, cli.no_config) {
        (Some(path), true) => ConfigLoader::load_file(path),
        (None, true) => Ok(ConfigLoader::load_defaults()),
        (path, false) => ConfigLoader::load(path.as_ref()),
    }
    .map_err(|e| anyhow!("failed to load configuration: {e}"))?;

    if let Some(level) = &cli.level {
        config.logger.level = level.clone();
    }
    config.logger.outputs.extend(cli.output.iter().cloned());

    config.validate()?;
    Ok(config)
}
