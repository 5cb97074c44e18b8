//! Configuration file support for rulebridge.
//!
//! Loads settings from `~/.rulebridge/config.toml` with the following precedence:
//! CLI arguments > Environment variables > Config file
//!
//! ## Configuration File Format
//!
//! ```toml
//! # ~/.rulebridge/config.toml
//!
//! [scan]
//! # Format used by `scan` and `import` instead of auto-detection
//! default_format = "cursor"
//!
//! [export]
//! # Replace existing files when exporting
//! overwrite = false
//! ```

use anyhow::{Context, Result};
use rulebridge_discovery::AgentFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const FORMAT_ENV: &str = "RULEBRIDGE_FORMAT";
pub const OVERWRITE_ENV: &str = "RULEBRIDGE_OVERWRITE";

/// Top-level configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Configuration for `scan` and `import`.
#[derive(Debug, Default, Deserialize)]
pub struct ScanConfig {
    pub default_format: Option<AgentFormat>,
}

/// Configuration for `export`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    pub overwrite: Option<bool>,
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".rulebridge").join("config.toml"))
}

/// Loads the configuration file if it exists.
///
/// Returns `Ok(None)` when there is no file and `Err` when it fails to parse.
pub fn load_config() -> Result<Option<Config>> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(None),
    }
}

fn load_config_from(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!(
        target: "rulebridge::config",
        path = %path.display(),
        "Loaded configuration file"
    );

    Ok(Some(config))
}

/// Copies config file settings into environment variables that are unset.
///
/// Must run before CLI parsing so clap's `env` fallbacks see the values.
pub fn apply_config_to_env() -> Result<()> {
    if let Some(config) = load_config()? {
        apply_to_env(&config);
    }
    Ok(())
}

fn apply_to_env(config: &Config) {
    fn set_if_absent(key: &str, value: &str) {
        if std::env::var_os(key).is_none() {
            std::env::set_var(key, value);
            tracing::trace!(
                target: "rulebridge::config",
                key,
                "Set environment variable from config file"
            );
        }
    }

    if let Some(format) = config.scan.default_format {
        set_if_absent(FORMAT_ENV, format.label());
    }
    if let Some(overwrite) = config.export.overwrite {
        set_if_absent(OVERWRITE_ENV, if overwrite { "true" } else { "false" });
    }
}
