//! The `mcpServers` object shared by Claude Code, Cursor and OpenCode.

use crate::common::{McpServer, McpTransport};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Reads the `mcpServers` object of a parsed JSON document.
///
/// Malformed entries are skipped; a missing or mistyped object yields nothing.
pub fn parse_mcp_servers(doc: &Value) -> Vec<McpServer> {
    let Some(entries) = doc.get("mcpServers").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut servers = Vec::new();
    for (name, config) in entries {
        if !config.is_object() {
            warn!(server = %name, "Skipping MCP server that is not a JSON object");
            continue;
        }

        let command = config
            .get("command")
            .and_then(Value::as_str)
            .map(String::from);
        let url = config.get("url").and_then(Value::as_str).map(String::from);

        let inferred = if command.is_some() {
            McpTransport::Stdio
        } else if url.is_some() {
            McpTransport::Sse
        } else {
            warn!(server = %name, "MCP server has neither 'command' nor 'url'");
            McpTransport::Stdio
        };
        let transport = match config.get("type").and_then(Value::as_str) {
            Some(raw) => McpTransport::parse(raw).unwrap_or_else(|| {
                warn!(server = %name, unknown_type = raw, "Unknown MCP server type, inferring from fields");
                inferred
            }),
            None => inferred,
        };

        let args = match config.get("args") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| {
                    let arg = item.as_str().map(String::from);
                    if arg.is_none() {
                        warn!(server = %name, value = ?item, "Skipping non-string value in MCP server args");
                    }
                    arg
                })
                .collect(),
            Some(other) => {
                warn!(server = %name, actual = ?other, "MCP server 'args' has wrong type, expected array");
                Vec::new()
            }
            None => Vec::new(),
        };

        let env: BTreeMap<String, String> = match config.get("env") {
            Some(Value::Object(vars)) => vars
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect(),
            Some(other) => {
                warn!(server = %name, actual = ?other, "MCP server 'env' has wrong type, expected object");
                BTreeMap::new()
            }
            None => BTreeMap::new(),
        };

        let enabled = config
            .get("enabled")
            .and_then(Value::as_bool)
            .or_else(|| config.get("disabled").and_then(Value::as_bool).map(|d| !d))
            .unwrap_or(true);

        servers.push(McpServer {
            name: name.clone(),
            transport,
            command,
            args,
            url,
            env,
            enabled,
        });
    }
    servers
}

/// Renders servers as the native `mcpServers` object.
///
/// `type` is written only when it would not be inferred back, and
/// `disabled` only for disabled servers.
pub fn render_mcp_servers(servers: &[McpServer]) -> Map<String, Value> {
    let mut out = Map::new();
    for server in servers {
        let mut entry = Map::new();
        if server.transport != McpTransport::Stdio || server.command.is_none() {
            entry.insert("type".into(), json!(server.transport.as_str()));
        }
        if let Some(command) = &server.command {
            entry.insert("command".into(), json!(command));
        }
        if !server.args.is_empty() {
            entry.insert("args".into(), json!(server.args));
        }
        if let Some(url) = &server.url {
            entry.insert("url".into(), json!(url));
        }
        if !server.env.is_empty() {
            entry.insert("env".into(), json!(server.env));
        }
        if !server.enabled {
            entry.insert("disabled".into(), json!(true));
        }
        out.insert(server.name.clone(), Value::Object(entry));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<McpServer> {
        parse_mcp_servers(&serde_json::from_str(text).unwrap())
    }

    #[test]
    fn parses_stdio_and_sse_servers() {
        let servers = parse(
            r#"{"mcpServers":{"supabase":{"command":"npx","args":["-y","supabase-mcp"],"type":"stdio"},"vercel":{"url":"https://vercel.com/api","type":"sse"}}}"#,
        );
        assert_eq!(servers.len(), 2);
        let supabase = servers.iter().find(|s| s.name == "supabase").unwrap();
        assert_eq!(supabase.command.as_deref(), Some("npx"));
        assert_eq!(supabase.args, vec!["-y", "supabase-mcp"]);
        assert_eq!(supabase.transport, McpTransport::Stdio);
        let vercel = servers.iter().find(|s| s.name == "vercel").unwrap();
        assert_eq!(vercel.transport, McpTransport::Sse);
        assert_eq!(vercel.url.as_deref(), Some("https://vercel.com/api"));
        assert!(vercel.enabled);
    }

    #[test]
    fn infers_transport_from_fields() {
        let servers = parse(
            r#"{"mcpServers":{"a":{"command":"bin"},"b":{"url":"https://b"},"c":{"url":"https://c","type":"http"}}}"#,
        );
        assert_eq!(servers[0].transport, McpTransport::Stdio);
        assert_eq!(servers[1].transport, McpTransport::Sse);
        assert_eq!(servers[2].transport, McpTransport::StreamableHttp);
    }

    #[test]
    fn unknown_type_falls_back_to_inference() {
        let servers = parse(r#"{"mcpServers":{"x":{"command":"bin","type":"carrier-pigeon"}}}"#);
        assert_eq!(servers[0].transport, McpTransport::Stdio);
    }

    #[test]
    fn reads_enabled_and_disabled_flags() {
        let servers = parse(
            r#"{"mcpServers":{"a":{"command":"a","disabled":true},"b":{"command":"b","enabled":false},"c":{"command":"c"}}}"#,
        );
        let flags: Vec<_> = servers.iter().map(|s| s.enabled).collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn wrong_types_degrade_per_field() {
        let servers = parse(
            r#"{"mcpServers":{"x":{"command":"bin","args":"--flag","env":["A"]},"y":"nope"}}"#,
        );
        assert_eq!(servers.len(), 1);
        assert!(servers[0].args.is_empty());
        assert!(servers[0].env.is_empty());
    }

    #[test]
    fn missing_section_is_empty() {
        assert!(parse(r#"{"other":1}"#).is_empty());
        assert!(parse(r#"{"mcpServers":[]}"#).is_empty());
    }

    #[test]
    fn render_omits_inferable_type_and_writes_disabled() {
        let servers = vec![
            McpServer {
                name: "local".into(),
                transport: McpTransport::Stdio,
                command: Some("bin".into()),
                args: vec!["--x".into()],
                url: None,
                env: BTreeMap::from([("K".into(), "V".into())]),
                enabled: false,
            },
            McpServer {
                name: "remote".into(),
                transport: McpTransport::StreamableHttp,
                command: None,
                args: Vec::new(),
                url: Some("https://remote".into()),
                env: BTreeMap::new(),
                enabled: true,
            },
        ];
        let rendered = Value::Object(render_mcp_servers(&servers));
        assert_eq!(
            rendered,
            json!({
                "local": {"command": "bin", "args": ["--x"], "env": {"K": "V"}, "disabled": true},
                "remote": {"type": "streamable-http", "url": "https://remote"}
            })
        );

        let reparsed = parse_mcp_servers(&json!({ "mcpServers": rendered }));
        assert_eq!(reparsed, servers);
    }
}
