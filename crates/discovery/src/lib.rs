//! Locates agent configuration files inside a project directory.
//!
//! This crate provides mechanisms for:
//! - Resolving the small glob dialect used by agent layouts (exact paths,
//!   `dir/*.ext`, and `dir/*/FILE`).
//! - Scanning a root for every supported agent format.
//! - Picking the format with the most matched files when none is forced.
//!
//! # Examples
//!
//! ```
//! use rulebridge_discovery::{scan, AgentFormat};
//! use tempfile::tempdir;
//!
//! let temp = tempdir().unwrap();
//! std::fs::write(temp.path().join("CLAUDE.md"), "Be helpful.").unwrap();
//!
//! let result = scan(temp.path(), None).unwrap().expect("claude files");
//! assert_eq!(result.format, AgentFormat::ClaudeCode);
//! assert_eq!(result.files[0].path, "CLAUDE.md");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Error type for discovery operations.
pub type Error = anyhow::Error;
/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pattern parsing and resolution against a root directory.
pub mod pattern;
/// Per-format scanning and auto-detection.
pub mod scanner;
/// Agent formats and scanned file types.
pub mod types;

pub use pattern::Pattern;
pub use scanner::{scan, scan_all, scan_format, scan_patterns};
pub use types::{AgentFormat, DiscoveryError, ScanResult, ScannedFile};
