//! Conversion between agent-native configuration files and one canonical model.
//!
//! Each supported agent format has an adapter that parses scanned files into an
//! [`AgentConfig`] and renders an [`AgentConfig`] back into files. Exporting to a
//! format that cannot hold every section reports the loss as warnings instead of
//! failing.
//!
//! # Examples
//!
//! ```
//! use rulebridge_discovery::{AgentFormat, ScannedFile};
//! use rulebridge_sync::{export, parse, Section};
//!
//! let files = [
//!     ScannedFile::new("CLAUDE.md", "Be helpful."),
//!     ScannedFile::new(".claude/skills/review/SKILL.md", "# Review"),
//! ];
//! let config = parse(AgentFormat::ClaudeCode, &files, "demo");
//! assert_eq!(config.skills.len(), 1);
//!
//! let report = export(&config.retargeted(AgentFormat::Cursor));
//! assert_eq!(report.file(".cursorrules").unwrap().content, "Be helpful.");
//! assert_eq!(report.warnings.len(), 1);
//! assert_eq!(report.warnings[0].section, Section::Skills);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Error type for fallible model operations.
pub type Error = anyhow::Error;
/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub mod adapters;
pub mod common;
pub mod frontmatter;
pub mod orchestrator;
pub mod report;

pub use adapters::{
    ClaudeCodeAdapter, ClineAdapter, CursorAdapter, FieldSupport, FormatAdapter,
    OpenCodeAdapter, WindsurfAdapter,
};
pub use common::{
    AgentConfig, AgentDefinition, Command, Instructions, McpServer, McpTransport,
    PermissionAction, Rule, Skill,
};
pub use orchestrator::{adapter_for, export, export_with, parse, section_len};
pub use report::{ExportReport, ExportWarning, ExportedFile, Rendered, Section, WarningKind};
