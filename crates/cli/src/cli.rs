use clap::{Parser, Subcommand};
use rulebridge_discovery::AgentFormat;
use std::path::PathBuf;

/// Command-line interface for the `rulebridge` application.
#[derive(Debug, Parser)]
#[command(
    name = "rulebridge",
    version,
    about = "Convert AI coding agent configuration between formats"
)]
pub struct Cli {
    /// Log at debug level (overrides `RUST_LOG`).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

/// Available `rulebridge` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lists supported formats and the files each one is detected by.
    Formats,
    /// Detects the agent format of a project directory.
    Scan {
        /// Project root to scan.
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Forces a format instead of auto-detecting.
        #[arg(long, env = "RULEBRIDGE_FORMAT")]
        format: Option<AgentFormat>,
    },
    /// Scans and parses a project into a canonical JSON model.
    Import {
        /// Project root to import.
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Forces a format instead of auto-detecting.
        #[arg(long, env = "RULEBRIDGE_FORMAT")]
        format: Option<AgentFormat>,
        /// Configuration name when the format has no manifest (default: directory name).
        #[arg(long)]
        name: Option<String>,
        /// Writes the model here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Writes a canonical JSON model out as native agent files.
    Export {
        /// Path to a model produced by `import`.
        model: PathBuf,
        /// Destination project root.
        #[arg(long, value_name = "DIR")]
        to: PathBuf,
        /// Target format (default: the model's `targetAgent`).
        #[arg(long)]
        format: Option<AgentFormat>,
        /// Lists the files that would be written without touching disk.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// Replaces files that already exist at the destination.
        #[arg(long, env = "RULEBRIDGE_OVERWRITE", default_value_t = false)]
        overwrite: bool,
    },
}
