use crate::types::{DiscoveryError, ScannedFile};
use crate::Result;
use anyhow::Context;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One of the three pattern shapes agent layouts are described with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A literal relative path (`CLAUDE.md`, `.claude/settings.json`).
    Exact(String),
    /// Every regular file in `dir` whose name ends with `suffix` (`dir/*.md`).
    FileGlob {
        /// Directory relative to the root; empty for the root itself.
        dir: String,
        /// Required file name ending, e.g. `.mdc`.
        suffix: String,
    },
    /// `suffix` inside each immediate subdirectory of `parent` (`dir/*/SKILL.md`).
    DirGlob {
        /// Directory relative to the root; empty for the root itself.
        parent: String,
        /// Path expected inside each subdirectory.
        suffix: String,
    },
}

impl Pattern {
    /// Classifies a pattern string.
    ///
    /// ```
    /// use rulebridge_discovery::Pattern;
    ///
    /// assert_eq!(Pattern::parse("CLAUDE.md").unwrap(), Pattern::Exact("CLAUDE.md".into()));
    /// assert!(matches!(Pattern::parse(".cursor/rules/*.mdc").unwrap(), Pattern::FileGlob { .. }));
    /// assert!(matches!(Pattern::parse(".claude/skills/*/SKILL.md").unwrap(), Pattern::DirGlob { .. }));
    /// ```
    pub fn parse(raw: &str) -> std::result::Result<Self, DiscoveryError> {
        let stars = raw.matches('*').count();
        if stars == 0 {
            return Ok(Pattern::Exact(raw.to_string()));
        }
        if stars > 1 {
            return Err(DiscoveryError::UnsupportedPattern(raw.to_string()));
        }

        let (head, tail) = raw
            .split_once('*')
            .ok_or_else(|| DiscoveryError::UnsupportedPattern(raw.to_string()))?;

        if let Some(suffix) = tail.strip_prefix('/') {
            // `*` must be a whole directory segment.
            if !(head.is_empty() || head.ends_with('/')) || suffix.is_empty() {
                return Err(DiscoveryError::UnsupportedPattern(raw.to_string()));
            }
            return Ok(Pattern::DirGlob {
                parent: head.trim_end_matches('/').to_string(),
                suffix: suffix.to_string(),
            });
        }

        if (head.is_empty() || head.ends_with('/')) && !tail.contains('/') {
            return Ok(Pattern::FileGlob {
                dir: head.trim_end_matches('/').to_string(),
                suffix: tail.to_string(),
            });
        }

        Err(DiscoveryError::UnsupportedPattern(raw.to_string()))
    }

    /// Resolves the pattern against `root`.
    ///
    /// Missing directories and files yield no matches. Directory listings are
    /// sorted by file name so results are stable across platforms.
    pub fn resolve(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        let mut matches = Vec::new();
        match self {
            Pattern::Exact(rel) => {
                let path = root.join(rel);
                if path.is_file() {
                    if let Some(content) = read_text(&path)? {
                        matches.push(ScannedFile::new(rel.clone(), content));
                    }
                }
            }
            Pattern::FileGlob { dir, suffix } => {
                let dir_path = root.join(dir);
                if !dir_path.is_dir() {
                    return Ok(matches);
                }
                for entry in list_dir(&dir_path) {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let name = entry.file_name().to_string_lossy();
                    if !name.ends_with(suffix.as_str()) {
                        continue;
                    }
                    if let Some(content) = read_text(entry.path())? {
                        matches.push(ScannedFile::new(join_rel(dir, &name), content));
                    }
                }
            }
            Pattern::DirGlob { parent, suffix } => {
                let parent_path = root.join(parent);
                if !parent_path.is_dir() {
                    return Ok(matches);
                }
                for entry in list_dir(&parent_path) {
                    if !entry.file_type().is_dir() {
                        continue;
                    }
                    let candidate = entry.path().join(suffix);
                    if !candidate.is_file() {
                        continue;
                    }
                    let name = entry.file_name().to_string_lossy();
                    if let Some(content) = read_text(&candidate)? {
                        let rel = join_rel(&join_rel(parent, &name), suffix);
                        matches.push(ScannedFile::new(rel, content));
                    }
                }
            }
        }
        debug!(pattern = ?self, root = %root.display(), matched = matches.len(), "resolved pattern");
        Ok(matches)
    }
}

/// Direct children of `dir`, symlinks resolved the same way `Path::is_file` does.
fn list_dir(dir: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "Skipping unreadable directory entry");
                None
            }
        })
}

fn join_rel(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Reads a file as UTF-8, returning `None` for files that vanished or are not text.
fn read_text(path: &Path) -> Result<Option<String>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(text)),
        Err(_) => {
            warn!(path = %path.display(), "Skipping file that is not valid UTF-8");
            Ok(None)
        }
    }
}
