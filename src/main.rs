//! dlsize — total size of a downloads folder.
//!
//! Thin binary entry point. All sizing logic lives in the `dlsize-core`
//! crate; this file parses arguments, installs logging and prints the report.

mod cli;
mod output;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Config};
use dlsize_core::fs::OsFileSystem;
use dlsize_core::Aggregator;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Config::from(Cli::parse());

    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    tracing::info!("dlsize measuring {}", config.root.display());

    let aggregator = Aggregator::with_options(OsFileSystem, config.options);
    let report = aggregator
        .scan(&config.root)
        .with_context(|| format!("failed to size {}", config.root.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    output::render(&mut out, &report, config.format, config.breakdown)
}
