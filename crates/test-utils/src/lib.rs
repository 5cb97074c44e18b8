//! Shared test utilities for rulebridge crates.
//!
//! Provides a temporary project directory plus seeded layouts for each agent
//! format, so scanner, parser and CLI tests agree on what a "real" project
//! looks like.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// A throwaway project directory.
///
/// The tempdir is removed when the fixture is dropped.
pub struct ProjectFixture {
    pub tempdir: tempfile::TempDir,
}

impl ProjectFixture {
    /// Creates an empty project directory.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            tempdir: tempfile::tempdir()?,
        })
    }

    /// Root of the project.
    pub fn root(&self) -> &Path {
        self.tempdir.path()
    }

    /// Writes `content` at `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// A Claude Code project touching every section the format supports.
    pub fn claude_project() -> std::io::Result<Self> {
        let fixture = Self::new()?;
        fixture.write("CLAUDE.md", "Be helpful.")?;
        fixture.write(
            ".claude/settings.json",
            r#"{"permissions":{"allow":["Bash(npm test)","Read"],"deny":["Write(*.env)"]}}"#,
        )?;
        fixture.write(
            ".mcp.json",
            r#"{"mcpServers":{"supabase":{"command":"npx","args":["-y","supabase-mcp"],"type":"stdio"},"vercel":{"url":"https://vercel.com/api","type":"sse"}}}"#,
        )?;
        fixture.write(
            ".claude/skills/code-review/SKILL.md",
            "---\nname: code-review\ndescription: Reviews diffs\n---\nLook for bugs.\n",
        )?;
        fixture.write(
            ".claude/commands/test.md",
            "---\ndescription: Run the test suite\nargument-hint: [filter]\nallowed-tools: Bash(npm test), Read\n---\nRun `npm test $ARGUMENTS` and summarize failures.\n",
        )?;
        fixture.write(
            ".claude/agents/reviewer.md",
            "---\nname: reviewer\ndescription: Reviews pull requests\nrole: reviewer\ntools: Read, Grep\n---\nReview the change for correctness.\n",
        )?;
        fixture.write(".claude/docs/architecture.md", "# Architecture\n")?;
        Ok(fixture)
    }

    /// A Cursor project with two rules and an MCP manifest.
    pub fn cursor_project() -> std::io::Result<Self> {
        let fixture = Self::new()?;
        fixture.write(".cursorrules", "Prefer small components.")?;
        fixture.write(
            ".cursor/rules/style-guide.mdc",
            "---\ndescription: Style Guide\nglobs: *.tsx\nalwaysApply: true\n---\nUse Tailwind CSS.\n",
        )?;
        fixture.write(
            ".cursor/rules/testing.mdc",
            "---\ndescription: Testing\nalwaysApply: false\n---\nWrite tests with vitest.\n",
        )?;
        fixture.write(
            ".cursor/mcp.json",
            r#"{"mcpServers":{"github":{"command":"gh-mcp","env":{"GITHUB_TOKEN":"x"}}}}"#,
        )?;
        Ok(fixture)
    }

    /// A Windsurf project: one rules file.
    pub fn windsurf_project() -> std::io::Result<Self> {
        let fixture = Self::new()?;
        fixture.write(".windsurfrules", "Always write docs.\nUse TypeScript.")?;
        Ok(fixture)
    }

    /// A Cline project with numbered rule files.
    pub fn cline_project() -> std::io::Result<Self> {
        let fixture = Self::new()?;
        fixture.write(".clinerules/01-instructions.md", "Main instructions.")?;
        fixture.write(".clinerules/02-style.md", "Style guide.")?;
        fixture.write(".clinerules/10-security.md", "Never log secrets.")?;
        Ok(fixture)
    }

    /// An OpenCode project with a full manifest.
    pub fn opencode_project() -> std::io::Result<Self> {
        let fixture = Self::new()?;
        fixture.write(
            "opencode.json",
            r#"{
  "name": "web-app",
  "description": "Frontend agent",
  "instructions": ["Be concise.", "Prefer hooks."],
  "mcpServers": {"docs": {"url": "https://docs.example.com/mcp", "type": "streamable-http"}},
  "permissions": {"bash": "ask", "edit": "allow", "webfetch": "deny"}
}"#,
        )?;
        Ok(fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_env_var_sets_and_restores() {
        let _g = env_guard();
        const KEY: &str = "RULEBRIDGE_TEST_UTILS_TEST_VAR";
        std::env::remove_var(KEY);

        {
            let _guard = set_env_var(KEY, Some("test_value"));
            assert_eq!(std::env::var(KEY).ok(), Some("test_value".to_string()));
        }
        assert!(std::env::var(KEY).is_err());
    }

    #[test]
    fn test_write_creates_parents() {
        let fixture = ProjectFixture::new().expect("fixture creation");
        let path = fixture.write("a/b/c.md", "hello").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn test_seeded_layouts_exist() {
        let claude = ProjectFixture::claude_project().unwrap();
        assert!(claude.root().join(".claude/skills/code-review/SKILL.md").is_file());

        let cline = ProjectFixture::cline_project().unwrap();
        assert!(cline.root().join(".clinerules/10-security.md").is_file());
    }
}
