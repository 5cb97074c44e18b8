//! Command-line front end for converting agent configuration between formats.

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    config::apply_config_to_env()?;
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    commands::run(cli.command)
}
