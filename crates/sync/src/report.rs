//! Export output and loss reporting.

use rulebridge_discovery::AgentFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical section other than instructions, which every format supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    /// [`AgentConfig::skills`](crate::AgentConfig::skills)
    Skills,
    /// [`AgentConfig::mcp_servers`](crate::AgentConfig::mcp_servers)
    McpServers,
    /// [`AgentConfig::permissions`](crate::AgentConfig::permissions)
    Permissions,
    /// [`AgentConfig::rules`](crate::AgentConfig::rules)
    Rules,
    /// [`AgentConfig::commands`](crate::AgentConfig::commands)
    Commands,
    /// [`AgentConfig::agent_definitions`](crate::AgentConfig::agent_definitions)
    AgentDefinitions,
    /// [`AgentConfig::docs`](crate::AgentConfig::docs)
    Docs,
}

impl Section {
    /// Every section, in the order warnings are reported.
    pub const ALL: [Section; 7] = [
        Section::Skills,
        Section::McpServers,
        Section::Permissions,
        Section::Rules,
        Section::Commands,
        Section::AgentDefinitions,
        Section::Docs,
    ];

    /// The canonical field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Skills => "skills",
            Section::McpServers => "mcpServers",
            Section::Permissions => "permissions",
            Section::Rules => "rules",
            Section::Commands => "commands",
            Section::AgentDefinitions => "agentDefinitions",
            Section::Docs => "docs",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a section lost information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WarningKind {
    /// The target has nowhere to put the section; every item was dropped.
    Unsupported {
        /// Items in the dropped section.
        count: usize,
    },
    /// The section was exported but some of it could not be represented.
    Degraded {
        /// What was lost, without the format or section prefix.
        reason: String,
    },
}

/// One section-level loss during export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportWarning {
    /// Export target.
    pub format: AgentFormat,
    /// Section that lost data.
    pub section: Section,
    /// Whole-section or partial loss.
    pub kind: WarningKind,
}

impl ExportWarning {
    /// `count` items of `section` had nowhere to go.
    pub fn unsupported(format: AgentFormat, section: Section, count: usize) -> Self {
        Self {
            format,
            section,
            kind: WarningKind::Unsupported { count },
        }
    }

    /// Part of `section` was exported; `reason` says what was lost.
    pub fn degraded(format: AgentFormat, section: Section, reason: impl Into<String>) -> Self {
        Self {
            format,
            section,
            kind: WarningKind::Degraded {
                reason: reason.into(),
            },
        }
    }

    /// Returns a human-readable description of the loss.
    pub fn description(&self) -> String {
        let target = self.format.display_name();
        match &self.kind {
            WarningKind::Unsupported { count } => format!(
                "{} does not support {}; {} item(s) were not exported",
                target, self.section, count
            ),
            WarningKind::Degraded { reason } => {
                format!("{} {} partially exported: {}", target, self.section, reason)
            }
        }
    }
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// A rendered file, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFile {
    /// Forward-slash path relative to the project root.
    pub path: String,
    /// Full file text.
    pub content: String,
}

impl ExportedFile {
    /// A file at `path` holding `content`.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Everything an adapter produced for the sections it supports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Files in the order the adapter produced them.
    pub files: Vec<ExportedFile>,
    /// Partial losses within supported sections.
    pub warnings: Vec<ExportWarning>,
}

/// The complete result of exporting one configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    /// Every file to write.
    pub files: Vec<ExportedFile>,
    /// Unsupported sections first, in [`Section::ALL`] order, then partial losses.
    pub warnings: Vec<ExportWarning>,
}

impl ExportReport {
    /// Warnings rendered as plain strings.
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ExportWarning::description).collect()
    }

    /// Looks up a rendered file by relative path.
    pub fn file(&self, path: &str) -> Option<&ExportedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Warnings for one section.
    pub fn warnings_for(&self, section: Section) -> Vec<&ExportWarning> {
        self.warnings
            .iter()
            .filter(|w| w.section == section)
            .collect()
    }
}
