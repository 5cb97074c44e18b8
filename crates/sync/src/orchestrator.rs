//! Dispatch between the canonical model and per-format adapters.
//!
//! Adapters only render what their format can hold. Loss reporting for whole
//! sections happens here, from each adapter's [`FieldSupport`], so every
//! format reports dropped sections the same way.
//!
//! [`FieldSupport`]: crate::adapters::FieldSupport

use crate::adapters::{
    ClaudeCodeAdapter, ClineAdapter, CursorAdapter, FormatAdapter, OpenCodeAdapter,
    WindsurfAdapter,
};
use crate::common::AgentConfig;
use crate::report::{ExportReport, ExportWarning, Section};
use rulebridge_discovery::{AgentFormat, ScannedFile};
use tracing::{debug, warn};

static CLAUDE_CODE: ClaudeCodeAdapter = ClaudeCodeAdapter;
static CURSOR: CursorAdapter = CursorAdapter;
static WINDSURF: WindsurfAdapter = WindsurfAdapter;
static CLINE: ClineAdapter = ClineAdapter;
static OPENCODE: OpenCodeAdapter = OpenCodeAdapter;

/// Returns the adapter for `format`.
pub fn adapter_for(format: AgentFormat) -> &'static dyn FormatAdapter {
    match format {
        AgentFormat::ClaudeCode => &CLAUDE_CODE,
        AgentFormat::Cursor => &CURSOR,
        AgentFormat::Windsurf => &WINDSURF,
        AgentFormat::Cline => &CLINE,
        AgentFormat::OpenCode => &OPENCODE,
    }
}

/// Parses scanned files of `format` into a canonical configuration.
///
/// ```
/// use rulebridge_discovery::{AgentFormat, ScannedFile};
/// use rulebridge_sync::parse;
///
/// let files = [ScannedFile::new(".windsurfrules", "Always write docs.")];
/// let config = parse(AgentFormat::Windsurf, &files, "my-project");
/// assert_eq!(config.name, "my-project");
/// assert_eq!(config.instructions.content, "Always write docs.");
/// ```
pub fn parse(format: AgentFormat, files: &[ScannedFile], fallback_name: &str) -> AgentConfig {
    debug!(%format, files = files.len(), "Parsing agent configuration");
    adapter_for(format).parse(files, fallback_name)
}

/// Exports `config` in its `target_agent` format.
pub fn export(config: &AgentConfig) -> ExportReport {
    export_with(adapter_for(config.target_agent), config)
}

/// Exports `config` through `adapter`, reporting every section it drops.
///
/// One unsupported-section warning is emitted per non-empty section the
/// adapter cannot hold, in [`Section::ALL`] order, followed by the adapter's
/// own partial-loss warnings.
pub fn export_with(adapter: &dyn FormatAdapter, config: &AgentConfig) -> ExportReport {
    let format = adapter.format();
    let support = adapter.supported_fields();
    let rendered = adapter.render(config);

    let mut warnings = Vec::new();
    for section in Section::ALL {
        let count = section_len(config, section);
        if count > 0 && !support.supports(section) {
            warn!(%format, %section, count, "Section not supported by target format");
            warnings.push(ExportWarning::unsupported(format, section, count));
        }
    }
    for warning in &rendered.warnings {
        warn!(%format, section = %warning.section, "{}", warning.description());
    }
    warnings.extend(rendered.warnings);

    debug!(
        %format,
        files = rendered.files.len(),
        warnings = warnings.len(),
        "Export complete"
    );
    ExportReport {
        files: rendered.files,
        warnings,
    }
}

/// Number of items `config` holds in `section`.
pub fn section_len(config: &AgentConfig, section: Section) -> usize {
    match section {
        Section::Skills => config.skills.len(),
        Section::McpServers => config.mcp_servers.len(),
        Section::Permissions => config.permissions.len(),
        Section::Rules => config.rules.len(),
        Section::Commands => config.commands.len(),
        Section::AgentDefinitions => config.agent_definitions.len(),
        Section::Docs => config.docs.len(),
    }
}
