//! Windsurf adapter: a single `.windsurfrules` file.
//!
//! The file is both the instructions and the only rule, so a parsed
//! configuration carries one rule that mirrors the instructions.

use super::traits::{FieldSupport, FormatAdapter};
use crate::common::{AgentConfig, Rule};
use crate::report::{ExportWarning, ExportedFile, Rendered, Section};
use rulebridge_discovery::{AgentFormat, ScannedFile};
use tracing::debug;

const RULES_FILE: &str = ".windsurfrules";
const MIRROR_TITLE: &str = "windsurfrules";

/// Adapter for Windsurf workspace rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindsurfAdapter;

impl FormatAdapter for WindsurfAdapter {
    fn format(&self) -> AgentFormat {
        AgentFormat::Windsurf
    }

    fn supported_fields(&self) -> FieldSupport {
        FieldSupport {
            rules: true,
            ..FieldSupport::default()
        }
    }

    fn parse(&self, files: &[ScannedFile], fallback_name: &str) -> AgentConfig {
        let mut config = AgentConfig::new(fallback_name, AgentFormat::Windsurf);
        let Some(file) = files.iter().find(|f| f.path == RULES_FILE) else {
            debug!("No .windsurfrules among scanned files");
            return config;
        };
        config.instructions.content = file.content.clone();
        config.rules.push(Rule {
            title: MIRROR_TITLE.to_string(),
            content: file.content.clone(),
            glob: None,
            always_apply: None,
        });
        config
    }

    fn render(&self, config: &AgentConfig) -> Rendered {
        let mut out = Rendered::default();
        out.files.push(ExportedFile::new(
            RULES_FILE,
            config.instructions.content.clone(),
        ));

        // The mirror rule is the file itself; anything else has no home.
        let dropped = config
            .rules
            .iter()
            .filter(|rule| rule.content != config.instructions.content)
            .count();
        if dropped > 0 {
            out.warnings.push(ExportWarning::degraded(
                AgentFormat::Windsurf,
                Section::Rules,
                format!("{dropped} rule(s) cannot be represented in {RULES_FILE}"),
            ));
        }
        out
    }
}
