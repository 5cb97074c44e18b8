//! Canonical configuration model shared by every parser and exporter.

use crate::Result;
use anyhow::Context;
use rulebridge_discovery::AgentFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One agent configuration, independent of any on-disk layout.
///
/// `target_agent` only records which format this value was parsed from or
/// will be exported to next; every section may hold data regardless of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Project or manifest name.
    pub name: String,
    /// Free text; only OpenCode manifests store it.
    #[serde(default)]
    pub description: String,
    /// Format this configuration was parsed from or is exported to.
    pub target_agent: AgentFormat,
    /// Top-level system prompt.
    #[serde(default)]
    pub instructions: Instructions,
    /// Skills, unique by id.
    #[serde(default)]
    pub skills: Vec<Skill>,
    /// MCP servers, unique by name.
    #[serde(default)]
    pub mcp_servers: Vec<McpServer>,
    /// Tool pattern (e.g. `Bash(npm test)`) to action. Keys are opaque.
    #[serde(default)]
    pub permissions: BTreeMap<String, PermissionAction>,
    /// Ordered; duplicate titles are allowed.
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// Slash commands, unique by name.
    #[serde(default)]
    pub commands: Vec<Command>,
    /// Sub-agents, unique by name.
    #[serde(default)]
    pub agent_definitions: Vec<AgentDefinition>,
    /// File name to markdown content.
    #[serde(default)]
    pub docs: BTreeMap<String, String>,
}

/// The system prompt text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructions {
    /// Prompt text, carried verbatim.
    pub content: String,
    /// Template the prompt was generated from. Never written to native files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

/// A reusable skill. Claude Code keeps `params.content` as `SKILL.md`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    /// Identifier, used as the skill's directory name.
    pub skill_id: String,
    /// Disabled skills are kept in the model but not exported.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Arbitrary parameters.
    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl Skill {
    /// The manifest text carried in `params.content`, if any.
    pub fn content(&self) -> Option<&str> {
        self.params.get("content").and_then(|v| v.as_str())
    }
}

/// Transport an MCP server is reached over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum McpTransport {
    /// A local process speaking over stdin/stdout.
    #[default]
    #[serde(rename = "stdio")]
    Stdio,
    /// Server-sent events.
    #[serde(rename = "sse")]
    Sse,
    /// Streamable HTTP.
    #[serde(rename = "streamable-http", alias = "http")]
    StreamableHttp,
}

impl McpTransport {
    /// The native `type` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Sse => "sse",
            Self::StreamableHttp => "streamable-http",
        }
    }

    /// Parses a native `type` value. `http` is accepted as streamable HTTP.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stdio" => Some(Self::Stdio),
            "sse" => Some(Self::Sse),
            "streamable-http" | "http" => Some(Self::StreamableHttp),
            _ => None,
        }
    }
}

/// An MCP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServer {
    /// Key under `mcpServers`.
    pub name: String,
    /// How the server is reached.
    #[serde(rename = "type", default)]
    pub transport: McpTransport,
    /// Executable for stdio servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Arguments passed to `command`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Endpoint for network transports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Environment for the server process.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    /// Written as `disabled: true` when false.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// What happens when a tool matching a permission key is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    /// Run without asking.
    Allow,
    /// Prompt the user first.
    Ask,
    /// Never run.
    Deny,
}

impl PermissionAction {
    /// Lowercase name, as stored in settings files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Ask => "ask",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "allow" => Ok(Self::Allow),
            "ask" => Ok(Self::Ask),
            "deny" => Ok(Self::Deny),
            other => Err(format!("invalid permission action '{other}'")),
        }
    }
}

/// A scoped block of guidance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Short title; Cursor stores it as `description`.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// File pattern the rule applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,
    /// Whether the rule is always in context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_apply: Option<bool>,
}

/// A slash command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// Slug without the leading slash (e.g. "commit-msg").
    pub name: String,
    /// One-line summary shown in the command picker.
    #[serde(default)]
    pub description: String,
    /// Placeholder text for arguments, e.g. `[filter]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_hint: Option<String>,
    /// Tool patterns the command may use; `None` means no restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<Vec<String>>,
    /// Prompt body.
    pub prompt: String,
}

/// A sub-agent definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDefinition {
    /// Unique name.
    pub name: String,
    /// When to delegate to this agent.
    #[serde(default)]
    pub description: String,
    /// Free-form role label.
    #[serde(default)]
    pub role: String,
    /// System prompt body.
    pub instructions: String,
    /// Tools the agent may use; `None` inherits all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

impl AgentConfig {
    /// An empty configuration targeting `format`.
    pub fn new(name: impl Into<String>, target_agent: AgentFormat) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            target_agent,
            instructions: Instructions::default(),
            skills: Vec::new(),
            mcp_servers: Vec::new(),
            permissions: BTreeMap::new(),
            rules: Vec::new(),
            commands: Vec::new(),
            agent_definitions: Vec::new(),
            docs: BTreeMap::new(),
        }
    }

    /// Adds a skill, replacing any skill with the same id in place.
    pub fn upsert_skill(&mut self, skill: Skill) {
        upsert_by(&mut self.skills, skill, |s| s.skill_id.as_str());
    }

    /// Adds an MCP server, replacing any server with the same name in place.
    pub fn upsert_mcp_server(&mut self, server: McpServer) {
        upsert_by(&mut self.mcp_servers, server, |s| s.name.as_str());
    }

    /// Adds a command, replacing any command with the same slug in place.
    pub fn upsert_command(&mut self, command: Command) {
        upsert_by(&mut self.commands, command, |c| c.name.as_str());
    }

    /// Adds an agent definition, replacing any definition with the same name in place.
    pub fn upsert_agent_definition(&mut self, agent: AgentDefinition) {
        upsert_by(&mut self.agent_definitions, agent, |a| a.name.as_str());
    }

    /// Collapses duplicate names in the keyed lists, last entry winning.
    ///
    /// Useful for values deserialized from untrusted JSON, which can
    /// hold duplicates the upsert methods would never produce.
    pub fn normalized(mut self) -> Self {
        for skill in std::mem::take(&mut self.skills) {
            self.upsert_skill(skill);
        }
        for server in std::mem::take(&mut self.mcp_servers) {
            self.upsert_mcp_server(server);
        }
        for command in std::mem::take(&mut self.commands) {
            self.upsert_command(command);
        }
        for agent in std::mem::take(&mut self.agent_definitions) {
            self.upsert_agent_definition(agent);
        }
        self
    }

    /// Reads a serialized model, collapsing duplicate names.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).context("Failed to parse agent configuration JSON")?;
        Ok(config.normalized())
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(self)
            .context("Failed to serialize agent configuration")?;
        text.push('\n');
        Ok(text)
    }

    /// Same content, tagged for another format.
    pub fn retargeted(&self, format: AgentFormat) -> Self {
        Self {
            target_agent: format,
            ..self.clone()
        }
    }
}

fn upsert_by<T>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> &str) {
    match items.iter().position(|existing| key(existing) == key(&item)) {
        Some(idx) => items[idx] = item,
        None => items.push(item),
    }
}
