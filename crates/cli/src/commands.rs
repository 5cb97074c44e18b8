//! Handlers for each `rulebridge` subcommand.

use crate::cli::Commands;
use anyhow::{bail, Context, Result};
use inquire::Select;
use rulebridge_discovery::{scan, AgentFormat, ScanResult};
use rulebridge_sync::{export, parse, AgentConfig, ExportReport};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub(crate) fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Formats => handle_formats_command(),
        Commands::Scan { dir, format } => handle_scan_command(&dir, format),
        Commands::Import {
            dir,
            format,
            name,
            output,
        } => handle_import_command(&dir, format, name, output),
        Commands::Export {
            model,
            to,
            format,
            dry_run,
            overwrite,
        } => handle_export_command(&model, &to, format, dry_run, overwrite),
    }
}

fn handle_formats_command() -> Result<()> {
    for format in AgentFormat::ALL {
        println!("{:<12} {}", format.label(), format.display_name());
        for pattern in format.patterns() {
            println!("    {pattern}");
        }
    }
    Ok(())
}

fn handle_scan_command(dir: &Path, format: Option<AgentFormat>) -> Result<()> {
    let Some(result) = scan(dir, format)? else {
        bail!("No agent configuration found in {}", dir.display());
    };
    println!(
        "{} ({} file{})",
        result.format,
        result.files.len(),
        if result.files.len() == 1 { "" } else { "s" }
    );
    for file in &result.files {
        println!("  {}", file.path);
    }
    Ok(())
}

fn handle_import_command(
    dir: &Path,
    format: Option<AgentFormat>,
    name: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let result = match (scan(dir, format)?, format) {
        (Some(result), _) => result,
        (None, Some(forced)) => bail!(
            "No {} configuration found in {}",
            forced.display_name(),
            dir.display()
        ),
        // Nothing detected: the chosen layout parses to an empty model.
        (None, None) => ScanResult {
            format: prompt_for_format(dir)?,
            files: Vec::new(),
        },
    };

    let name = name.unwrap_or_else(|| default_name(dir));
    let config = parse(result.format, &result.files, &name);
    info!(format = %result.format, files = result.files.len(), "Imported configuration");

    let json = config.to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{json}"),
    }
    Ok(())
}

fn prompt_for_format(dir: &Path) -> Result<AgentFormat> {
    if !std::io::stdin().is_terminal() {
        bail!(
            "No agent configuration found in {}; pass --format to choose one",
            dir.display()
        );
    }
    let selection = Select::new(
        "No agent configuration detected. Which format is this project?",
        AgentFormat::ALL.to_vec(),
    )
    .prompt()?;
    Ok(selection)
}

/// The directory's own name, used when a format has no manifest name.
fn default_name(dir: &Path) -> String {
    let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    resolved
        .file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .unwrap_or_else(|| "project".to_string())
}

fn handle_export_command(
    model: &Path,
    to: &Path,
    format: Option<AgentFormat>,
    dry_run: bool,
    overwrite: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(model)
        .with_context(|| format!("Failed to read {}", model.display()))?;
    let mut config = AgentConfig::from_json(&text)
        .with_context(|| format!("Invalid model in {}", model.display()))?;
    if let Some(format) = format {
        config = config.retargeted(format);
    }

    let report = export(&config);
    for message in report.warning_messages() {
        eprintln!("warning: {message}");
    }

    let summary = write_report(&report, to, dry_run, overwrite)?;
    let verb = if dry_run { "would write" } else { "wrote" };
    println!(
        "{}: {verb} {}, skipped {}",
        config.target_agent,
        summary.written.len(),
        summary.skipped.len()
    );
    if !summary.skipped.is_empty() {
        eprintln!("Skipped existing files (use --overwrite to replace):");
        for path in &summary.skipped {
            eprintln!("  - {}", path.display());
        }
    }
    Ok(())
}

/// Files written and files left alone by [`write_report`].
#[derive(Debug, Default)]
pub(crate) struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Writes every exported file under `root`.
///
/// Existing files are skipped unless `overwrite` is set. A dry run only
/// reports what would be written.
pub(crate) fn write_report(
    report: &ExportReport,
    root: &Path,
    dry_run: bool,
    overwrite: bool,
) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();
    for file in &report.files {
        let path = root.join(&file.path);
        if path.exists() && !overwrite {
            debug!(path = %path.display(), "Skipping existing file");
            summary.skipped.push(path);
            continue;
        }
        if dry_run {
            println!("  {}", path.display());
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, &file.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        summary.written.push(path);
    }
    Ok(summary)
}
