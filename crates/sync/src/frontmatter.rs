//! Line-oriented frontmatter used by rule, command and agent files.
//!
//! ```text
//! ---
//! description: Style Guide
//! globs: *.tsx
//! alwaysApply: true
//! ---
//! Use Tailwind CSS.
//! ```
//!
//! Values are flat `key: value` strings. Nothing is interpreted as YAML, so
//! globs such as `*.tsx` survive unquoted.

/// Ordered `key: value` pairs from a frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: Vec<(String, String)>,
}

impl Frontmatter {
    /// Value of the last occurrence of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Non-empty value of `key`.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// `true`/`false` value of `key`; anything else is unset.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Comma-separated list under `key`, trimmed, empty items removed.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(split_list)
    }

    /// True when the block had no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A text file split into its frontmatter and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// `None` when the file has no complete frontmatter block.
    pub frontmatter: Option<Frontmatter>,
    /// Trimmed body after the closing delimiter, or the whole file.
    pub content: String,
}

enum State {
    Start,
    InBlock,
}

/// Splits `text` into frontmatter and body.
///
/// The block must open on the very first line. A block that never closes
/// is not frontmatter: the whole file becomes the body.
pub fn parse(text: &str) -> ParsedDocument {
    let mut state = State::Start;
    let mut fields = Vec::new();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);
        offset += line.len();
        match state {
            State::Start => {
                if bare != "---" {
                    break;
                }
                state = State::InBlock;
            }
            State::InBlock => {
                if bare == "---" {
                    return ParsedDocument {
                        frontmatter: Some(Frontmatter { fields }),
                        content: text[offset..].trim().to_string(),
                    };
                }
                if let Some(field) = parse_field(bare) {
                    fields.push(field);
                }
            }
        }
    }

    ParsedDocument {
        frontmatter: None,
        content: text.trim().to_string(),
    }
}

fn parse_field(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = trimmed.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), unquote(value.trim()).to_string()))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Renders a frontmatter block followed by `body`.
///
/// Fields with `None` values are left out. Newlines inside values are
/// flattened because the format is one field per line.
pub fn render(fields: &[(&str, Option<String>)], body: &str) -> String {
    let mut out = String::from("---\n");
    for (key, value) in fields {
        let Some(value) = value else { continue };
        let flat = value.replace(['\r', '\n'], " ");
        let flat = flat.trim();
        if flat.is_empty() {
            out.push_str(&format!("{key}:\n"));
        } else {
            out.push_str(&format!("{key}: {flat}\n"));
        }
    }
    out.push_str("---\n\n");
    out.push_str(body.trim());
    out.push('\n');
    out
}

/// Joins a list for a comma-separated frontmatter field.
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cursor_rule() {
        let doc = parse(
            "---\ndescription: Style Guide\nglobs: *.tsx\nalwaysApply: true\n---\nUse Tailwind CSS.\n",
        );
        let fm = doc.frontmatter.expect("frontmatter");
        assert_eq!(fm.get("description"), Some("Style Guide"));
        assert_eq!(fm.get("globs"), Some("*.tsx"));
        assert_eq!(fm.get_bool("alwaysApply"), Some(true));
        assert_eq!(doc.content, "Use Tailwind CSS.");
    }

    #[test]
    fn no_leading_delimiter_means_no_frontmatter() {
        let doc = parse("Intro\n---\ndescription: nope\n---\nBody");
        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.content, "Intro\n---\ndescription: nope\n---\nBody");
    }

    #[test]
    fn missing_closing_delimiter_keeps_whole_file() {
        let text = "---\ndescription: Unterminated\nstill header?";
        let doc = parse(text);
        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.content, text);
    }

    #[test]
    fn handles_crlf_and_quotes() {
        let doc = parse("---\r\ntitle: \"Quoted: value\"\r\nname: 'single'\r\n---\r\nBody\r\n");
        let fm = doc.frontmatter.unwrap();
        assert_eq!(fm.get("title"), Some("Quoted: value"));
        assert_eq!(fm.get("name"), Some("single"));
        assert_eq!(doc.content, "Body");
    }

    #[test]
    fn empty_block_and_body() {
        let doc = parse("---\n---\n");
        assert_eq!(doc.frontmatter, Some(Frontmatter::default()));
        assert_eq!(doc.content, "");
    }

    #[test]
    fn ignores_comments_and_lines_without_colon() {
        let doc = parse("---\n# comment\nloose line\nkey: value\n---\nx");
        let fm = doc.frontmatter.unwrap();
        assert_eq!(fm.get("key"), Some("value"));
        assert_eq!(fm.get("loose line"), None);
    }

    #[test]
    fn bool_and_list_helpers() {
        let doc = parse("---\nalwaysApply: maybe\ntools: Read, Grep ,, Bash(npm test)\nempty:\n---\n");
        let fm = doc.frontmatter.unwrap();
        assert_eq!(fm.get_bool("alwaysApply"), None);
        assert_eq!(
            fm.get_list("tools"),
            Some(vec!["Read".into(), "Grep".into(), "Bash(npm test)".into()])
        );
        assert_eq!(fm.get("empty"), Some(""));
        assert_eq!(fm.get_non_empty("empty"), None);
        assert_eq!(fm.get_list("missing"), None);
    }

    #[test]
    fn render_skips_none_and_flattens_newlines() {
        let text = render(
            &[
                ("description", Some("Line one\nline two".into())),
                ("globs", None),
                ("alwaysApply", Some("false".into())),
            ],
            "Body text\n\n",
        );
        assert_eq!(
            text,
            "---\ndescription: Line one line two\nalwaysApply: false\n---\n\nBody text\n"
        );
    }

    #[test]
    fn render_then_parse_preserves_fields() {
        let text = render(
            &[
                ("description", Some("Style Guide".into())),
                ("globs", Some("src/**/*.tsx".into())),
            ],
            "Use Tailwind CSS.",
        );
        let doc = parse(&text);
        let fm = doc.frontmatter.unwrap();
        assert_eq!(fm.get("description"), Some("Style Guide"));
        assert_eq!(fm.get("globs"), Some("src/**/*.tsx"));
        assert_eq!(doc.content, "Use Tailwind CSS.");
    }
}
