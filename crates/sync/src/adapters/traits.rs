//! Trait definition for format adapters.

use crate::common::AgentConfig;
use crate::report::{Rendered, Section};
use rulebridge_discovery::{AgentFormat, ScannedFile};

/// Describes which canonical sections a format can represent.
///
/// Instructions are always supported and have no flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSupport {
    /// `skills`
    pub skills: bool,
    /// `mcpServers`
    pub mcp_servers: bool,
    /// `permissions`
    pub permissions: bool,
    /// `rules`
    pub rules: bool,
    /// `commands`
    pub commands: bool,
    /// `agentDefinitions`
    pub agent_definitions: bool,
    /// `docs`
    pub docs: bool,
}

impl FieldSupport {
    /// The flag for `section`.
    pub fn supports(&self, section: Section) -> bool {
        match section {
            Section::Skills => self.skills,
            Section::McpServers => self.mcp_servers,
            Section::Permissions => self.permissions,
            Section::Rules => self.rules,
            Section::Commands => self.commands,
            Section::AgentDefinitions => self.agent_definitions,
            Section::Docs => self.docs,
        }
    }
}

#[cfg(test)]
use mockall::automock;

/// Converts between one agent's native files and the canonical model.
///
/// Both directions are pure: no I/O, no shared state.
#[cfg_attr(test, automock)]
pub trait FormatAdapter: Send + Sync {
    /// The format this adapter reads and writes.
    fn format(&self) -> AgentFormat;

    /// Sections this format can hold besides instructions.
    fn supported_fields(&self) -> FieldSupport;

    /// Builds a configuration from scanned files.
    ///
    /// Never fails: unreadable or malformed sections come back empty.
    fn parse(&self, files: &[ScannedFile], fallback_name: &str) -> AgentConfig;

    /// Renders the instructions file plus every supported, non-empty section.
    ///
    /// Unsupported sections are ignored here; the caller reports them.
    fn render(&self, config: &AgentConfig) -> Rendered;
}
