//! Cline adapter: numbered markdown files under `.clinerules/`.
//!
//! The lowest-numbered file holds the instructions; every other file is one
//! rule, in ascending numeric order.

use super::traits::{FieldSupport, FormatAdapter};
use super::utils::slugify;
use crate::common::{AgentConfig, Rule};
use crate::report::{ExportWarning, ExportedFile, Rendered, Section};
use regex::Regex;
use rulebridge_discovery::{AgentFormat, ScannedFile};
use std::cmp::Ordering;
use std::sync::LazyLock;

const RULES_DIR: &str = ".clinerules/";
const INSTRUCTIONS_FILE: &str = ".clinerules/01-instructions.md";

// `NN-name`, `NN_name`, `NN name` or bare `NN`.
static NUMBERED_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:[-_ ](.*))?$").expect("valid regex"));

/// Adapter for Cline rule directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClineAdapter;

struct RuleFile<'a> {
    order: Option<u64>,
    title: String,
    file: &'a ScannedFile,
}

impl<'a> RuleFile<'a> {
    fn new(file: &'a ScannedFile) -> Self {
        let stem = file.file_stem();
        match NUMBERED_STEM.captures(stem) {
            Some(caps) => {
                let order = caps.get(1).and_then(|m| m.as_str().parse().ok());
                let title = caps
                    .get(2)
                    .map(|m| m.as_str())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(stem)
                    .to_string();
                Self { order, title, file }
            }
            None => Self {
                order: None,
                title: stem.to_string(),
                file,
            },
        }
    }

    /// Numbered files first, ascending; unnumbered files after, by name.
    fn cmp_position(&self, other: &Self) -> Ordering {
        match (self.order, other.order) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| self.file.file_name().cmp(other.file.file_name()))
    }
}

impl FormatAdapter for ClineAdapter {
    fn format(&self) -> AgentFormat {
        AgentFormat::Cline
    }

    fn supported_fields(&self) -> FieldSupport {
        FieldSupport {
            rules: true,
            ..FieldSupport::default()
        }
    }

    fn parse(&self, files: &[ScannedFile], fallback_name: &str) -> AgentConfig {
        let mut config = AgentConfig::new(fallback_name, AgentFormat::Cline);

        let mut entries: Vec<RuleFile<'_>> = files
            .iter()
            .filter(|f| f.path.starts_with(RULES_DIR) && f.path.ends_with(".md"))
            .map(RuleFile::new)
            .collect();
        entries.sort_by(|a, b| a.cmp_position(b));

        let mut entries = entries.into_iter();
        if let Some(first) = entries.next() {
            config.instructions.content = first.file.content.clone();
        }
        for entry in entries {
            config.rules.push(Rule {
                title: entry.title,
                content: entry.file.content.clone(),
                glob: None,
                always_apply: None,
            });
        }

        config
    }

    fn render(&self, config: &AgentConfig) -> Rendered {
        let mut out = Rendered::default();
        out.files.push(ExportedFile::new(
            INSTRUCTIONS_FILE,
            config.instructions.content.clone(),
        ));

        for (idx, rule) in config.rules.iter().enumerate() {
            out.files.push(ExportedFile::new(
                format!("{}{:02}-{}.md", RULES_DIR, idx + 2, slugify(&rule.title)),
                rule.content.clone(),
            ));
        }

        let mut reasons = Vec::new();
        let scoped = config
            .rules
            .iter()
            .filter(|r| r.glob.is_some() || r.always_apply.is_some())
            .count();
        if scoped > 0 {
            reasons.push(format!("glob and alwaysApply dropped for {scoped} rule(s)"));
        }
        // Titles only live in the file name, so anything slugify changes is lost.
        let retitled = config
            .rules
            .iter()
            .filter(|r| slugify(&r.title) != r.title)
            .count();
        if retitled > 0 {
            reasons.push(format!(
                "{retitled} rule title(s) were reduced to file-name slugs"
            ));
        }
        if !reasons.is_empty() {
            out.warnings.push(ExportWarning::degraded(
                AgentFormat::Cline,
                Section::Rules,
                reasons.join("; "),
            ));
        }
        out
    }
}
