//! Shared utility functions for format adapters.

use crate::report::{ExportWarning, ExportedFile, Rendered, Section};
use regex::Regex;
use rulebridge_discovery::AgentFormat;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Sanitizes a command/agent name to prevent path traversal.
/// Only allows alphanumeric characters, hyphens, and underscores.
pub fn sanitize_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if safe.is_empty() {
        "unnamed".to_string()
    } else {
        safe
    }
}

/// Sanitizes a doc file name: no separators, no leading dots.
pub fn sanitize_file_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    let safe = safe.trim_start_matches('.');
    if safe.is_empty() {
        "doc.md".to_string()
    } else {
        safe.to_string()
    }
}

/// Lowercase, hyphen-separated slug for a rule title.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let slug = NON_SLUG.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "rule".to_string()
    } else {
        slug.to_string()
    }
}

/// Returns `base`, or `base-2`, `base-3`, ... if already taken.
pub fn unique_slug(used: &mut HashSet<String>, base: String) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Writes `docs` under `dir` and reports names that will not come back.
///
/// The scanners only pick up `*.md` files in a docs directory, and file names
/// go through [`sanitize_file_name`], so other names are exported but lost on
/// re-import.
pub fn render_docs(
    out: &mut Rendered,
    format: AgentFormat,
    dir: &str,
    docs: &BTreeMap<String, String>,
) {
    let mut lossy = 0;
    for (name, content) in docs {
        let file_name = sanitize_file_name(name);
        if file_name != *name || !name.ends_with(".md") {
            lossy += 1;
        }
        out.files
            .push(ExportedFile::new(format!("{dir}{file_name}"), content.clone()));
    }
    if lossy > 0 {
        out.warnings.push(ExportWarning::degraded(
            format,
            Section::Docs,
            format!("{lossy} doc(s) renamed or not named *.md will not be re-imported"),
        ));
    }
}

/// Parses JSON, logging and returning `None` when malformed.
pub fn parse_json(path: &str, text: &str) -> Option<serde_json::Value> {
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(path, error = %err, "Ignoring malformed JSON");
            None
        }
    }
}

/// Pretty JSON with a trailing newline, as written to disk.
pub fn pretty_json(value: &serde_json::Value) -> String {
    let mut text = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    text.push('\n');
    text
}
