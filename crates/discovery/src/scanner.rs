use crate::pattern::Pattern;
use crate::types::{AgentFormat, ScanResult, ScannedFile};
use crate::Result;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Resolves `patterns` in order, keeping the first file seen for each path.
pub fn scan_patterns(root: &Path, patterns: &[&str]) -> Result<Vec<ScannedFile>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for raw in patterns {
        let pattern = Pattern::parse(raw)?;
        for file in pattern.resolve(root)? {
            if seen.insert(file.path.clone()) {
                files.push(file);
            }
        }
    }
    Ok(files)
}

/// Collects every file belonging to one format's layout.
pub fn scan_format(root: &Path, format: AgentFormat) -> Result<Vec<ScannedFile>> {
    let files = scan_patterns(root, format.patterns())?;
    debug!(format = %format, root = %root.display(), files = files.len(), "scanned format");
    Ok(files)
}

/// Scans `root` once per format, in declaration order.
pub fn scan_all(root: &Path) -> Result<Vec<(AgentFormat, Vec<ScannedFile>)>> {
    let mut results = Vec::with_capacity(AgentFormat::ALL.len());
    for format in AgentFormat::ALL {
        results.push((format, scan_format(root, format)?));
    }
    Ok(results)
}

/// Scans `root` for agent configuration.
///
/// With a forced format only that layout is resolved. Otherwise the format
/// with the most matched files wins, ties going to the earlier-declared
/// format. Returns `Ok(None)` when nothing matched.
pub fn scan(root: &Path, forced: Option<AgentFormat>) -> Result<Option<ScanResult>> {
    if let Some(format) = forced {
        let files = scan_format(root, format)?;
        if files.is_empty() {
            return Ok(None);
        }
        return Ok(Some(ScanResult { format, files }));
    }

    let mut best: Option<ScanResult> = None;
    for (format, files) in scan_all(root)? {
        let beats_best = match &best {
            Some(current) => files.len() > current.files.len(),
            None => !files.is_empty(),
        };
        if beats_best {
            best = Some(ScanResult { format, files });
        }
    }

    match &best {
        Some(result) => debug!(
            format = %result.format,
            files = result.files.len(),
            "detected agent format"
        ),
        None => debug!(root = %root.display(), "no agent configuration found"),
    }
    Ok(best)
}
