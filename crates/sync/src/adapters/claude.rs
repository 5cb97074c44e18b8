//! Claude Code adapter: `CLAUDE.md` plus the `.claude/` directory.

use super::mcp::{parse_mcp_servers, render_mcp_servers};
use super::traits::{FieldSupport, FormatAdapter};
use super::utils::{parse_json, pretty_json, render_docs, sanitize_name, unique_slug};
use crate::common::{AgentConfig, AgentDefinition, Command, PermissionAction, Skill};
use crate::frontmatter;
use crate::report::{ExportWarning, ExportedFile, Rendered, Section};
use rulebridge_discovery::{AgentFormat, ScannedFile};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

const INSTRUCTIONS_FILE: &str = "CLAUDE.md";
const SETTINGS_FILE: &str = ".claude/settings.json";
const MCP_FILE: &str = ".mcp.json";
const SKILLS_DIR: &str = ".claude/skills/";
const COMMANDS_DIR: &str = ".claude/commands/";
const AGENTS_DIR: &str = ".claude/agents/";
const DOCS_DIR: &str = ".claude/docs/";

/// Permission buckets in `settings.json`, in the order they are applied.
const PERMISSION_KEYS: [(&str, PermissionAction); 3] = [
    ("allow", PermissionAction::Allow),
    ("ask", PermissionAction::Ask),
    ("deny", PermissionAction::Deny),
];

/// Adapter for Claude Code project configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeCodeAdapter;

enum ClaudeFile {
    Instructions,
    Settings,
    Mcp,
    Skill,
    Command,
    Agent,
    Doc,
}

fn classify(path: &str) -> Option<ClaudeFile> {
    match path {
        INSTRUCTIONS_FILE => Some(ClaudeFile::Instructions),
        SETTINGS_FILE => Some(ClaudeFile::Settings),
        MCP_FILE => Some(ClaudeFile::Mcp),
        p if p.starts_with(SKILLS_DIR) && p.ends_with("/SKILL.md") => Some(ClaudeFile::Skill),
        p if p.starts_with(COMMANDS_DIR) && p.ends_with(".md") => Some(ClaudeFile::Command),
        p if p.starts_with(AGENTS_DIR) && p.ends_with(".md") => Some(ClaudeFile::Agent),
        p if p.starts_with(DOCS_DIR) => Some(ClaudeFile::Doc),
        _ => None,
    }
}

impl FormatAdapter for ClaudeCodeAdapter {
    fn format(&self) -> AgentFormat {
        AgentFormat::ClaudeCode
    }

    fn supported_fields(&self) -> FieldSupport {
        FieldSupport {
            skills: true,
            mcp_servers: true,
            permissions: true,
            rules: false,
            commands: true,
            agent_definitions: true,
            docs: true,
        }
    }

    fn parse(&self, files: &[ScannedFile], fallback_name: &str) -> AgentConfig {
        let mut config = AgentConfig::new(fallback_name, AgentFormat::ClaudeCode);

        for file in files {
            let Some(kind) = classify(&file.path) else {
                debug!(path = %file.path, "Ignoring file outside the Claude Code layout");
                continue;
            };
            match kind {
                ClaudeFile::Instructions => config.instructions.content = file.content.clone(),
                ClaudeFile::Settings => {
                    let Some(settings) = parse_json(&file.path, &file.content) else {
                        continue;
                    };
                    config.permissions.extend(parse_permissions(&settings));
                    // User-level settings may also carry servers; .mcp.json overrides them.
                    for server in parse_mcp_servers(&settings) {
                        config.upsert_mcp_server(server);
                    }
                }
                ClaudeFile::Mcp => {
                    if let Some(doc) = parse_json(&file.path, &file.content) {
                        for server in parse_mcp_servers(&doc) {
                            config.upsert_mcp_server(server);
                        }
                    }
                }
                ClaudeFile::Skill => {
                    let Some(skill_id) = file.parent_name() else {
                        continue;
                    };
                    let mut params = BTreeMap::new();
                    if !file.content.is_empty() {
                        params.insert("content".to_string(), Value::String(file.content.clone()));
                    }
                    config.upsert_skill(Skill {
                        skill_id: skill_id.to_string(),
                        enabled: true,
                        params,
                    });
                }
                ClaudeFile::Command => config.upsert_command(parse_command(file)),
                ClaudeFile::Agent => config.upsert_agent_definition(parse_agent(file)),
                ClaudeFile::Doc => {
                    config
                        .docs
                        .insert(file.file_name().to_string(), file.content.clone());
                }
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

        if !config.permissions.is_empty() {
            let settings = json!({ "permissions": render_permissions(&config.permissions) });
            out.files
                .push(ExportedFile::new(SETTINGS_FILE, pretty_json(&settings)));
        }

        if !config.mcp_servers.is_empty() {
            let doc = json!({ "mcpServers": render_mcp_servers(&config.mcp_servers) });
            out.files.push(ExportedFile::new(MCP_FILE, pretty_json(&doc)));
        }

        render_skills(&mut out, &config.skills);

        let mut used = HashSet::new();
        let mut unnamed = 0;
        for command in &config.commands {
            let stem = unique_slug(&mut used, sanitize_name(&command.name));
            if command.name.is_empty() {
                unnamed += 1;
            }
            out.files.push(ExportedFile::new(
                format!("{COMMANDS_DIR}{stem}.md"),
                render_command(command, &stem),
            ));
        }
        if unnamed > 0 {
            out.warnings.push(ExportWarning::degraded(
                AgentFormat::ClaudeCode,
                Section::Commands,
                format!("{unnamed} command(s) without a name were exported as \"unnamed\""),
            ));
        }

        let mut used = HashSet::new();
        let mut unnamed = 0;
        for agent in &config.agent_definitions {
            let stem = unique_slug(&mut used, sanitize_name(&agent.name));
            if agent.name.is_empty() {
                unnamed += 1;
            }
            out.files.push(ExportedFile::new(
                format!("{AGENTS_DIR}{stem}.md"),
                render_agent(agent),
            ));
        }
        if unnamed > 0 {
            out.warnings.push(ExportWarning::degraded(
                AgentFormat::ClaudeCode,
                Section::AgentDefinitions,
                format!("{unnamed} agent(s) without a name were exported as \"unnamed\""),
            ));
        }

        render_docs(&mut out, AgentFormat::ClaudeCode, DOCS_DIR, &config.docs);

        out
    }
}

/// One `SKILL.md` per enabled skill, holding the `content` param verbatim.
fn render_skills(out: &mut Rendered, skills: &[Skill]) {
    let mut disabled = 0;
    let mut extra_params = 0;
    let mut renamed = 0;
    for skill in skills {
        if !skill.enabled {
            disabled += 1;
            continue;
        }
        if !params_fit_skill_file(skill) {
            extra_params += 1;
        }
        let dir = sanitize_name(&skill.skill_id);
        if dir != skill.skill_id {
            renamed += 1;
        }
        out.files.push(ExportedFile::new(
            format!("{SKILLS_DIR}{dir}/SKILL.md"),
            skill.content().unwrap_or_default(),
        ));
    }

    let mut reasons = Vec::new();
    if disabled > 0 {
        reasons.push(format!("{disabled} disabled skill(s) were not exported"));
    }
    if extra_params > 0 {
        reasons.push(format!(
            "params other than content were dropped for {extra_params} skill(s)"
        ));
    }
    if renamed > 0 {
        reasons.push(format!("{renamed} skill id(s) were changed to fit a directory name"));
    }
    if !reasons.is_empty() {
        out.warnings.push(ExportWarning::degraded(
            AgentFormat::ClaudeCode,
            Section::Skills,
            reasons.join("; "),
        ));
    }
}

/// An empty `SKILL.md` reads back as no params, so only non-empty string content survives.
fn params_fit_skill_file(skill: &Skill) -> bool {
    skill
        .params
        .iter()
        .all(|(key, value)| key == "content" && value.as_str().is_some_and(|s| !s.is_empty()))
}

fn parse_permissions(settings: &Value) -> BTreeMap<String, PermissionAction> {
    let mut permissions = BTreeMap::new();
    let Some(section) = settings.get("permissions") else {
        return permissions;
    };
    for (key, action) in PERMISSION_KEYS {
        let Some(entries) = section.get(key).and_then(Value::as_array) else {
            continue;
        };
        for tool in entries.iter().filter_map(Value::as_str) {
            permissions.insert(tool.to_string(), action);
        }
    }
    permissions
}

fn render_permissions(permissions: &BTreeMap<String, PermissionAction>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, action) in PERMISSION_KEYS {
        let tools: Vec<&str> = permissions
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(tool, _)| tool.as_str())
            .collect();
        if !tools.is_empty() {
            out.insert(key.to_string(), json!(tools));
        }
    }
    out
}

fn parse_command(file: &ScannedFile) -> Command {
    let doc = frontmatter::parse(&file.content);
    let fm = doc.frontmatter.unwrap_or_default();
    Command {
        name: fm
            .get_non_empty("name")
            .unwrap_or_else(|| file.file_stem())
            .to_string(),
        description: fm.get("description").unwrap_or_default().to_string(),
        argument_hint: fm.get("argument-hint").map(String::from),
        allowed_tools: fm.get_list("allowed-tools"),
        prompt: doc.content,
    }
}

/// `name` is written only when the file stem does not already carry it.
fn render_command(command: &Command, stem: &str) -> String {
    frontmatter::render(
        &[
            ("name", Some(command.name.clone()).filter(|n| n != stem && !n.is_empty())),
            ("description", Some(command.description.clone())),
            ("argument-hint", command.argument_hint.clone()),
            (
                "allowed-tools",
                command.allowed_tools.as_deref().map(frontmatter::join_list),
            ),
        ],
        &command.prompt,
    )
}

fn parse_agent(file: &ScannedFile) -> AgentDefinition {
    let doc = frontmatter::parse(&file.content);
    let fm = doc.frontmatter.unwrap_or_default();
    AgentDefinition {
        name: fm
            .get_non_empty("name")
            .unwrap_or_else(|| file.file_stem())
            .to_string(),
        description: fm.get("description").unwrap_or_default().to_string(),
        role: fm.get("role").unwrap_or_default().to_string(),
        instructions: doc.content,
        tools: fm.get_list("tools"),
    }
}

fn render_agent(agent: &AgentDefinition) -> String {
    frontmatter::render(
        &[
            ("name", Some(agent.name.clone())),
            ("description", Some(agent.description.clone())),
            ("role", Some(agent.role.clone()).filter(|r| !r.is_empty())),
            ("tools", agent.tools.as_deref().map(frontmatter::join_list)),
        ],
        &agent.instructions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{McpServer, McpTransport};

    fn file(path: &str, content: &str) -> ScannedFile {
        ScannedFile::new(path, content)
    }

    #[test]
    fn instructions_only_project() {
        let config = ClaudeCodeAdapter.parse(&[file("CLAUDE.md", "Be helpful.")], "demo");
        assert_eq!(config.instructions.content, "Be helpful.");
        assert_eq!(config.target_agent, AgentFormat::ClaudeCode);
        assert_eq!(config.name, "demo");
        assert!(config.rules.is_empty());
    }

    #[test]
    fn settings_permissions_map_to_actions() {
        let config = ClaudeCodeAdapter.parse(
            &[file(
                ".claude/settings.json",
                r#"{"permissions":{"allow":["Bash(npm test)","Read"],"deny":["Write(*.env)"]}}"#,
            )],
            "demo",
        );
        assert_eq!(
            config.permissions,
            BTreeMap::from([
                ("Bash(npm test)".to_string(), PermissionAction::Allow),
                ("Read".to_string(), PermissionAction::Allow),
                ("Write(*.env)".to_string(), PermissionAction::Deny),
            ])
        );
    }

    #[test]
    fn deny_wins_over_allow_for_same_tool() {
        let config = ClaudeCodeAdapter.parse(
            &[file(
                ".claude/settings.json",
                r#"{"permissions":{"allow":["Bash"],"ask":["Bash"],"deny":["Bash"]}}"#,
            )],
            "demo",
        );
        assert_eq!(config.permissions["Bash"], PermissionAction::Deny);
    }

    #[test]
    fn malformed_settings_do_not_abort_parse() {
        let config = ClaudeCodeAdapter.parse(
            &[
                file("CLAUDE.md", "still here"),
                file(".claude/settings.json", "{ nope"),
                file(".mcp.json", r#"{"mcpServers":{"a":{"command":"a"}}}"#),
            ],
            "demo",
        );
        assert!(config.permissions.is_empty());
        assert_eq!(config.instructions.content, "still here");
        assert_eq!(config.mcp_servers.len(), 1);
    }

    #[test]
    fn mcp_json_overrides_settings_servers() {
        let config = ClaudeCodeAdapter.parse(
            &[
                file(
                    ".claude/settings.json",
                    r#"{"mcpServers":{"db":{"command":"old"},"extra":{"command":"x"}}}"#,
                ),
                file(".mcp.json", r#"{"mcpServers":{"db":{"command":"new"}}}"#),
            ],
            "demo",
        );
        assert_eq!(config.mcp_servers.len(), 2);
        let db = config.mcp_servers.iter().find(|s| s.name == "db").unwrap();
        assert_eq!(db.command.as_deref(), Some("new"));
    }

    #[test]
    fn skills_commands_agents_and_docs() {
        let config = ClaudeCodeAdapter.parse(
            &[
                file(".claude/skills/code-review/SKILL.md", "# Review"),
                file(
                    ".claude/commands/test.md",
                    "---\ndescription: Run tests\nargument-hint: [filter]\nallowed-tools: Bash(npm test), Read\n---\nRun the tests.",
                ),
                file(".claude/commands/plain.md", "Just a prompt."),
                file(
                    ".claude/agents/reviewer.md",
                    "---\nname: pr-reviewer\ndescription: Reviews PRs\ntools: Read, Grep\n---\nReview carefully.",
                ),
                file(".claude/docs/architecture.md", "# Arch"),
            ],
            "demo",
        );

        assert_eq!(config.skills.len(), 1);
        assert_eq!(config.skills[0].skill_id, "code-review");
        assert_eq!(config.skills[0].content(), Some("# Review"));

        let test = &config.commands[0];
        assert_eq!(test.name, "test");
        assert_eq!(test.description, "Run tests");
        assert_eq!(test.argument_hint.as_deref(), Some("[filter]"));
        assert_eq!(
            test.allowed_tools,
            Some(vec!["Bash(npm test)".to_string(), "Read".to_string()])
        );
        assert_eq!(test.prompt, "Run the tests.");

        let plain = &config.commands[1];
        assert_eq!(plain.description, "");
        assert_eq!(plain.allowed_tools, None);
        assert_eq!(plain.prompt, "Just a prompt.");

        let agent = &config.agent_definitions[0];
        assert_eq!(agent.name, "pr-reviewer");
        assert_eq!(agent.tools, Some(vec!["Read".to_string(), "Grep".to_string()]));
        assert_eq!(agent.instructions, "Review carefully.");

        assert_eq!(config.docs["architecture.md"], "# Arch");
    }

    #[test]
    fn render_writes_only_non_empty_sections() {
        let mut config = AgentConfig::new("demo", AgentFormat::ClaudeCode);
        config.instructions.content = "Be helpful.".into();
        let rendered = ClaudeCodeAdapter.render(&config);
        assert_eq!(
            rendered.files,
            vec![ExportedFile::new("CLAUDE.md", "Be helpful.")]
        );
        assert!(rendered.warnings.is_empty());
    }

    #[test]
    fn render_permissions_groups_by_action() {
        let mut config = AgentConfig::new("demo", AgentFormat::ClaudeCode);
        config
            .permissions
            .insert("Read".into(), PermissionAction::Allow);
        config
            .permissions
            .insert("Bash(rm -rf *)".into(), PermissionAction::Deny);
        config
            .permissions
            .insert("WebFetch".into(), PermissionAction::Ask);

        let rendered = ClaudeCodeAdapter.render(&config);
        let settings = rendered
            .files
            .iter()
            .find(|f| f.path == SETTINGS_FILE)
            .unwrap();
        let value: Value = serde_json::from_str(&settings.content).unwrap();
        assert_eq!(
            value,
            json!({"permissions": {"allow": ["Read"], "ask": ["WebFetch"], "deny": ["Bash(rm -rf *)"]}})
        );
    }

    #[test]
    fn render_skips_disabled_skills_with_warning() {
        let mut config = AgentConfig::new("demo", AgentFormat::ClaudeCode);
        config.upsert_skill(Skill {
            skill_id: "on".into(),
            enabled: true,
            params: BTreeMap::new(),
        });
        config.upsert_skill(Skill {
            skill_id: "off".into(),
            enabled: false,
            params: BTreeMap::new(),
        });

        let rendered = ClaudeCodeAdapter.render(&config);
        let skill = rendered
            .files
            .iter()
            .find(|f| f.path == ".claude/skills/on/SKILL.md")
            .expect("enabled skill written");
        assert_eq!(skill.content, "");
        assert!(!rendered.files.iter().any(|f| f.path.contains("/off/")));
        assert_eq!(rendered.warnings.len(), 1);
        assert_eq!(rendered.warnings[0].section, Section::Skills);
    }

    #[test]
    fn render_then_parse_is_stable() {
        let mut config = AgentConfig::new("demo", AgentFormat::ClaudeCode);
        config.instructions.content = "Be helpful.".into();
        config
            .permissions
            .insert("Bash(npm test)".into(), PermissionAction::Allow);
        config.upsert_mcp_server(McpServer {
            name: "vercel".into(),
            transport: McpTransport::Sse,
            command: None,
            args: Vec::new(),
            url: Some("https://vercel.com/api".into()),
            env: BTreeMap::new(),
            enabled: true,
        });
        config.upsert_command(Command {
            name: "deploy".into(),
            description: "Ship it".into(),
            argument_hint: None,
            allowed_tools: Some(vec!["Bash(git push)".into()]),
            prompt: "Deploy to production.".into(),
        });
        config.upsert_agent_definition(AgentDefinition {
            name: "planner".into(),
            description: "Plans work".into(),
            role: "architect".into(),
            instructions: "Break the task down.".into(),
            tools: None,
        });
        config.docs.insert("notes.md".into(), "# Notes\n".into());

        let rendered = ClaudeCodeAdapter.render(&config);
        let files: Vec<_> = rendered
            .files
            .iter()
            .map(|f| ScannedFile::new(f.path.clone(), f.content.clone()))
            .collect();
        assert_eq!(ClaudeCodeAdapter.parse(&files, "demo"), config);
    }

    fn reparse(config: &AgentConfig) -> AgentConfig {
        let files: Vec<_> = ClaudeCodeAdapter
            .render(config)
            .files
            .into_iter()
            .map(|f| ScannedFile::new(f.path, f.content))
            .collect();
        ClaudeCodeAdapter.parse(&files, &config.name)
    }

    #[test]
    fn skill_without_content_round_trips_as_empty_file() {
        let mut config = AgentConfig::new("demo", AgentFormat::ClaudeCode);
        config.upsert_skill(Skill {
            skill_id: "lint".into(),
            enabled: true,
            params: BTreeMap::new(),
        });

        let rendered = ClaudeCodeAdapter.render(&config);
        assert!(rendered.warnings.is_empty());
        assert_eq!(reparse(&config), config);
    }

    #[test]
    fn extra_skill_params_are_reported() {
        let mut config = AgentConfig::new("demo", AgentFormat::ClaudeCode);
        config.upsert_skill(Skill {
            skill_id: "lint".into(),
            enabled: true,
            params: BTreeMap::from([
                ("content".to_string(), json!("# Lint")),
                ("level".to_string(), json!(3)),
            ]),
        });
        config.upsert_skill(Skill {
            skill_id: "review".into(),
            enabled: true,
            params: BTreeMap::from([("content".to_string(), json!("# Review"))]),
        });

        let rendered = ClaudeCodeAdapter.render(&config);
        assert_eq!(rendered.warnings.len(), 1);
        assert_eq!(rendered.warnings[0].section, Section::Skills);
        assert!(rendered.warnings[0]
            .description()
            .contains("params other than content were dropped for 1 skill(s)"));
        assert_eq!(reparse(&config).skills[1], config.skills[1]);
    }

    #[test]
    fn command_names_survive_file_name_sanitizing() {
        let mut config = AgentConfig::new("demo", AgentFormat::ClaudeCode);
        for name in ["review.pr", "reviewpr", "test"] {
            config.upsert_command(Command {
                name: name.into(),
                description: String::new(),
                argument_hint: None,
                allowed_tools: None,
                prompt: format!("Run {name}."),
            });
        }

        let rendered = ClaudeCodeAdapter.render(&config);
        assert!(rendered.warnings.is_empty());
        let paths: Vec<_> = rendered.files.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.contains(&".claude/commands/reviewpr.md"));
        assert!(paths.contains(&".claude/commands/reviewpr-2.md"));
        let test = rendered
            .files
            .iter()
            .find(|f| f.path == ".claude/commands/test.md")
            .unwrap();
        assert!(!test.content.contains("name:"));

        let mut names: Vec<_> = reparse(&config)
            .commands
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["review.pr", "reviewpr", "test"]);
    }

    #[test]
    fn nameless_commands_and_agents_are_reported() {
        let mut config = AgentConfig::new("demo", AgentFormat::ClaudeCode);
        config.upsert_command(Command {
            name: String::new(),
            description: String::new(),
            argument_hint: None,
            allowed_tools: None,
            prompt: "x".into(),
        });
        config.upsert_agent_definition(AgentDefinition {
            name: String::new(),
            description: String::new(),
            role: String::new(),
            instructions: "y".into(),
            tools: None,
        });

        let rendered = ClaudeCodeAdapter.render(&config);
        let sections: Vec<_> = rendered.warnings.iter().map(|w| w.section).collect();
        assert_eq!(sections, vec![Section::Commands, Section::AgentDefinitions]);
        assert!(rendered.files.iter().any(|f| f.path == ".claude/agents/unnamed.md"));
    }
}
