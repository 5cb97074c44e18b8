//! OpenCode adapter: a single `opencode.json` manifest.

use super::mcp::{parse_mcp_servers, render_mcp_servers};
use super::traits::{FieldSupport, FormatAdapter};
use super::utils::{parse_json, pretty_json};
use crate::common::{AgentConfig, PermissionAction};
use crate::report::{ExportedFile, Rendered};
use rulebridge_discovery::{AgentFormat, ScannedFile};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const MANIFEST_FILE: &str = "opencode.json";
const INSTRUCTIONS_SEPARATOR: &str = "\n\n";

/// Adapter for OpenCode project manifests.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCodeAdapter;

impl FormatAdapter for OpenCodeAdapter {
    fn format(&self) -> AgentFormat {
        AgentFormat::OpenCode
    }

    fn supported_fields(&self) -> FieldSupport {
        FieldSupport {
            mcp_servers: true,
            permissions: true,
            ..FieldSupport::default()
        }
    }

    fn parse(&self, files: &[ScannedFile], fallback_name: &str) -> AgentConfig {
        let mut config = AgentConfig::new(fallback_name, AgentFormat::OpenCode);
        let Some(file) = files.iter().find(|f| f.path == MANIFEST_FILE) else {
            debug!("No opencode.json among scanned files");
            return config;
        };
        let Some(manifest) = parse_json(&file.path, &file.content) else {
            return config;
        };

        if let Some(name) = manifest
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            config.name = name.to_string();
        }
        if let Some(description) = manifest.get("description").and_then(Value::as_str) {
            config.description = description.to_string();
        }
        config.instructions.content = parse_instructions(manifest.get("instructions"));
        config.mcp_servers = parse_mcp_servers(&manifest);
        config.permissions = parse_permissions(manifest.get("permissions"));

        config
    }

    fn render(&self, config: &AgentConfig) -> Rendered {
        let mut manifest = Map::new();
        manifest.insert("name".into(), Value::String(config.name.clone()));
        if !config.description.is_empty() {
            manifest.insert(
                "description".into(),
                Value::String(config.description.clone()),
            );
        }
        manifest.insert(
            "instructions".into(),
            Value::String(config.instructions.content.clone()),
        );
        if !config.mcp_servers.is_empty() {
            manifest.insert(
                "mcpServers".into(),
                Value::Object(render_mcp_servers(&config.mcp_servers)),
            );
        }
        if !config.permissions.is_empty() {
            let permissions: Map<String, Value> = config
                .permissions
                .iter()
                .map(|(tool, action)| (tool.clone(), Value::String(action.as_str().into())))
                .collect();
            manifest.insert("permissions".into(), Value::Object(permissions));
        }

        Rendered {
            files: vec![ExportedFile::new(
                MANIFEST_FILE,
                pretty_json(&Value::Object(manifest)),
            )],
            warnings: Vec::new(),
        }
    }
}

/// A string is used verbatim; a list of strings is joined.
fn parse_instructions(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let text = item.as_str();
                if text.is_none() {
                    warn!(value = ?item, "Skipping non-string entry in opencode instructions");
                }
                text
            })
            .collect::<Vec<_>>()
            .join(INSTRUCTIONS_SEPARATOR),
        Some(other) => {
            warn!(actual = ?other, "opencode 'instructions' has wrong type, expected string or array");
            String::new()
        }
    }
}

fn parse_permissions(value: Option<&Value>) -> BTreeMap<String, PermissionAction> {
    let mut permissions = BTreeMap::new();
    let Some(entries) = value.and_then(Value::as_object) else {
        return permissions;
    };
    for (tool, action) in entries {
        match action.as_str().map(str::parse::<PermissionAction>) {
            Some(Ok(action)) => {
                permissions.insert(tool.clone(), action);
            }
            _ => warn!(tool = %tool, value = ?action, "Ignoring invalid permission action"),
        }
    }
    permissions
}
