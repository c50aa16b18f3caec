//! Binary crate for the `city-weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and browsing
//! - Human-friendly output formatting

use anyhow::Context;
use clap::Parser;
use std::{fs::File, path::Path, sync::Mutex};
use tracing_subscriber::EnvFilter;

mod cli;
mod interactive;
mod render;

/// Diagnostics go to stderr (default `warn`) or, with `--log`, to a file at `debug`.
fn init_logging(log: Option<&Path>) -> anyhow::Result<()> {
    let filter = |default: &str| {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter("debug"))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter("warn"))
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_logging(cmd.log.as_deref())?;
    tracing::debug!(command = ?cmd.command, "starting");

    cmd.run().await
}
