//! Cursor adapter: `.cursorrules`, `.cursor/rules/*.mdc` and `.cursor/mcp.json`.

use super::mcp::{parse_mcp_servers, render_mcp_servers};
use super::traits::{FieldSupport, FormatAdapter};
use super::utils::{parse_json, pretty_json, render_docs, slugify, unique_slug};
use crate::common::{AgentConfig, Rule};
use crate::frontmatter;
use crate::report::{ExportedFile, Rendered};
use rulebridge_discovery::{AgentFormat, ScannedFile};
use serde_json::json;
use std::collections::HashSet;
use tracing::debug;

const INSTRUCTIONS_FILE: &str = ".cursorrules";
const RULES_DIR: &str = ".cursor/rules/";
const MCP_FILE: &str = ".cursor/mcp.json";
const DOCS_DIR: &str = ".cursor/docs/";

/// Adapter for Cursor project rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorAdapter;

impl FormatAdapter for CursorAdapter {
    fn format(&self) -> AgentFormat {
        AgentFormat::Cursor
    }

    fn supported_fields(&self) -> FieldSupport {
        FieldSupport {
            mcp_servers: true,
            rules: true,
            docs: true,
            ..FieldSupport::default()
        }
    }

    fn parse(&self, files: &[ScannedFile], fallback_name: &str) -> AgentConfig {
        let mut config = AgentConfig::new(fallback_name, AgentFormat::Cursor);

        for file in files {
            let path = file.path.as_str();
            if path == INSTRUCTIONS_FILE {
                config.instructions.content = file.content.clone();
            } else if path == MCP_FILE {
                if let Some(doc) = parse_json(path, &file.content) {
                    for server in parse_mcp_servers(&doc) {
                        config.upsert_mcp_server(server);
                    }
                }
            } else if path.starts_with(RULES_DIR) && path.ends_with(".mdc") {
                config.rules.push(parse_rule(file));
            } else if path.starts_with(DOCS_DIR) {
                config
                    .docs
                    .insert(file.file_name().to_string(), file.content.clone());
            } else {
                debug!(path, "Ignoring file outside the Cursor layout");
            }
        }

        config
    }

    fn render(&self, config: &AgentConfig) -> Rendered {
        let mut out = Rendered::default();
        out.files.push(ExportedFile::new(
            INSTRUCTIONS_FILE,
            config.instructions.content.clone(),
        ));

        let mut used = HashSet::new();
        for rule in &config.rules {
            let slug = unique_slug(&mut used, slugify(&rule.title));
            out.files.push(ExportedFile::new(
                format!("{RULES_DIR}{slug}.mdc"),
                render_rule(rule),
            ));
        }

        if !config.mcp_servers.is_empty() {
            let doc = json!({ "mcpServers": render_mcp_servers(&config.mcp_servers) });
            out.files.push(ExportedFile::new(MCP_FILE, pretty_json(&doc)));
        }

        render_docs(&mut out, AgentFormat::Cursor, DOCS_DIR, &config.docs);

        out
    }
}

/// Reads one `.mdc` rule. Without frontmatter the file stem becomes the title.
fn parse_rule(file: &ScannedFile) -> Rule {
    let doc = frontmatter::parse(&file.content);
    match doc.frontmatter {
        Some(fm) => Rule {
            title: fm
                .get_non_empty("description")
                .unwrap_or_else(|| file.file_stem())
                .to_string(),
            content: doc.content,
            glob: fm.get_non_empty("globs").map(String::from),
            always_apply: fm.get_bool("alwaysApply"),
        },
        None => Rule {
            title: file.file_stem().to_string(),
            content: doc.content,
            glob: None,
            always_apply: None,
        },
    }
}

fn render_rule(rule: &Rule) -> String {
    frontmatter::render(
        &[
            ("description", Some(rule.title.clone())),
            ("globs", rule.glob.clone()),
            ("alwaysApply", rule.always_apply.map(|b| b.to_string())),
        ],
        &rule.content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mdc_frontmatter_into_rule() {
        let config = CursorAdapter.parse(
            &[ScannedFile::new(
                ".cursor/rules/style.mdc",
                "---\ndescription: Style Guide\nglobs: *.tsx\nalwaysApply: true\n---\nUse Tailwind CSS.",
            )],
            "web",
        );
        assert_eq!(
            config.rules,
            vec![Rule {
                title: "Style Guide".into(),
                content: "Use Tailwind CSS.".into(),
                glob: Some("*.tsx".into()),
                always_apply: Some(true),
            }]
        );
    }

    #[test]
    fn rule_without_frontmatter_uses_file_stem() {
        let config = CursorAdapter.parse(
            &[ScannedFile::new(".cursor/rules/naming.mdc", "Use camelCase.")],
            "web",
        );
        assert_eq!(config.rules[0].title, "naming");
        assert_eq!(config.rules[0].content, "Use camelCase.");
        assert_eq!(config.rules[0].glob, None);
        assert_eq!(config.rules[0].always_apply, None);
    }

    #[test]
    fn unterminated_frontmatter_is_content() {
        let text = "---\ndescription: Broken\nUse tabs.";
        let config =
            CursorAdapter.parse(&[ScannedFile::new(".cursor/rules/broken.mdc", text)], "web");
        assert_eq!(config.rules[0].title, "broken");
        assert_eq!(config.rules[0].content, text);
    }

    #[test]
    fn instructions_and_mcp() {
        let config = CursorAdapter.parse(
            &[
                ScannedFile::new(".cursorrules", "Prefer small components."),
                ScannedFile::new(".cursor/mcp.json", r#"{"mcpServers":{"gh":{"command":"gh-mcp"}}}"#),
            ],
            "web",
        );
        assert_eq!(config.instructions.content, "Prefer small components.");
        assert_eq!(config.mcp_servers[0].name, "gh");
        assert!(config.permissions.is_empty());
    }

    #[test]
    fn render_synthesizes_frontmatter_and_dedupes_names() {
        let mut config = AgentConfig::new("web", AgentFormat::Cursor);
        config.rules.push(Rule {
            title: "Style Guide".into(),
            content: "Use Tailwind CSS.".into(),
            glob: Some("*.tsx".into()),
            always_apply: Some(true),
        });
        config.rules.push(Rule {
            title: "Style Guide".into(),
            content: "Second copy.".into(),
            glob: None,
            always_apply: None,
        });

        let rendered = CursorAdapter.render(&config);
        let paths: Vec<_> = rendered.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                ".cursorrules",
                ".cursor/rules/style-guide.mdc",
                ".cursor/rules/style-guide-2.mdc"
            ]
        );
        assert_eq!(
            rendered.files[1].content,
            "---\ndescription: Style Guide\nglobs: *.tsx\nalwaysApply: true\n---\n\nUse Tailwind CSS.\n"
        );
        assert_eq!(
            rendered.files[2].content,
            "---\ndescription: Style Guide\n---\n\nSecond copy.\n"
        );
    }
}
