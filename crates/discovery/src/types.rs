use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors surfaced to callers that need to branch on them.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiscoveryError {
    /// The format identifier is not one of the supported agents.
    #[error("unknown agent format '{0}' (expected one of: claude-code, cursor, windsurf, cline, opencode)")]
    UnknownFormat(String),
    /// The pattern uses a wildcard shape the resolver does not understand.
    #[error("unsupported pattern '{0}'")]
    UnsupportedPattern(String),
}

/// A supported agent runtime and its on-disk conventions.
///
/// The variant order is the declaration order used for auto-detection
/// tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentFormat {
    /// Claude Code: `CLAUDE.md` plus the `.claude/` directory.
    #[serde(rename = "claude-code")]
    ClaudeCode,
    /// Cursor: `.cursorrules` plus `.cursor/rules/*.mdc`.
    #[serde(rename = "cursor")]
    Cursor,
    /// Windsurf: a single `.windsurfrules` file.
    #[serde(rename = "windsurf")]
    Windsurf,
    /// Cline: numbered markdown files under `.clinerules/`.
    #[serde(rename = "cline")]
    Cline,
    /// OpenCode: a single `opencode.json` manifest.
    #[serde(rename = "opencode")]
    OpenCode,
}

impl AgentFormat {
    /// Every format, in declaration order.
    pub const ALL: [AgentFormat; 5] = [
        AgentFormat::ClaudeCode,
        AgentFormat::Cursor,
        AgentFormat::Windsurf,
        AgentFormat::Cline,
        AgentFormat::OpenCode,
    ];

    /// Returns the stable identifier for this format.
    pub fn label(&self) -> &'static str {
        match self {
            AgentFormat::ClaudeCode => "claude-code",
            AgentFormat::Cursor => "cursor",
            AgentFormat::Windsurf => "windsurf",
            AgentFormat::Cline => "cline",
            AgentFormat::OpenCode => "opencode",
        }
    }

    /// Returns the product name used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentFormat::ClaudeCode => "Claude Code",
            AgentFormat::Cursor => "Cursor",
            AgentFormat::Windsurf => "Windsurf",
            AgentFormat::Cline => "Cline",
            AgentFormat::OpenCode => "OpenCode",
        }
    }

    /// The ordered patterns that make up this format's layout.
    ///
    /// Earlier patterns win when two patterns match the same path.
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            AgentFormat::ClaudeCode => &[
                "CLAUDE.md",
                ".claude/settings.json",
                ".mcp.json",
                ".claude/skills/*/SKILL.md",
                ".claude/commands/*.md",
                ".claude/agents/*.md",
                ".claude/docs/*.md",
            ],
            AgentFormat::Cursor => &[
                ".cursorrules",
                ".cursor/rules/*.mdc",
                ".cursor/mcp.json",
                ".cursor/docs/*.md",
            ],
            AgentFormat::Windsurf => &[".windsurfrules"],
            AgentFormat::Cline => &[".clinerules/*.md"],
            AgentFormat::OpenCode => &["opencode.json"],
        }
    }
}

impl fmt::Display for AgentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgentFormat {
    type Err = DiscoveryError;

    /// Parses a format identifier.
    ///
    /// ```
    /// use rulebridge_discovery::AgentFormat;
    ///
    /// assert_eq!("cursor".parse::<AgentFormat>(), Ok(AgentFormat::Cursor));
    /// assert_eq!("Claude".parse::<AgentFormat>(), Ok(AgentFormat::ClaudeCode));
    /// assert!("vim".parse::<AgentFormat>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "claude-code" | "claude_code" | "claude" => Ok(AgentFormat::ClaudeCode),
            "cursor" => Ok(AgentFormat::Cursor),
            "windsurf" => Ok(AgentFormat::Windsurf),
            "cline" => Ok(AgentFormat::Cline),
            "opencode" | "open-code" => Ok(AgentFormat::OpenCode),
            _ => Err(DiscoveryError::UnknownFormat(s.to_string())),
        }
    }
}

/// A matched file, relative to the scanned root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedFile {
    /// Path relative to the root, always `/`-separated.
    pub path: String,
    /// UTF-8 file contents.
    pub content: String,
}

impl ScannedFile {
    /// Creates a scanned file from a relative path and its contents.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// The last path segment.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// The last path segment without its final extension.
    ///
    /// Dotfiles keep their name: `.windsurfrules` stems to `windsurfrules`.
    pub fn file_stem(&self) -> &str {
        let name = self.file_name().trim_start_matches('.');
        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }

    /// The name of the directory holding this file, if any.
    pub fn parent_name(&self) -> Option<&str> {
        let mut segments = self.path.rsplit('/');
        segments.next();
        segments.next()
    }
}

/// The outcome of a successful scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// The format the files were matched for.
    pub format: AgentFormat,
    /// Every matched file, de-duplicated by path, in pattern order.
    pub files: Vec<ScannedFile>,
}
