//! YAML frontmatter reading and alias merging
//!
//! A note's frontmatter is the YAML block between a leading `---` line and the
//! next `---` line. Everything after the closing line is the body and is never
//! modified.

use alias_history_config::Settings;
use alias_history_core::{Error, Properties, Result};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;

const DELIMITER: &str = "---";
const ALIASES_KEY: &str = "aliases";

/// Split `content` into its frontmatter YAML and the body
///
/// Returns `None` when the note does not start with a complete frontmatter
/// block.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(DELIMITER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

fn parse_mapping(path: &str, yaml: &str) -> Result<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(mapping)) => Ok(mapping),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(Error::frontmatter(path, "frontmatter is not a mapping")),
        Err(e) => Err(Error::frontmatter(path, e)),
    }
}

/// Parse the frontmatter of `content` into properties
///
/// Notes without frontmatter, or whose frontmatter is not valid YAML, have no
/// properties.
pub fn properties(content: &str) -> Option<Properties> {
    let (yaml, _) = split(content)?;
    if yaml.trim().is_empty() {
        return Some(Properties::new());
    }

    match serde_yaml::from_str::<serde_json::Value>(yaml) {
        Ok(serde_json::Value::Object(map)) => Some(map),
        Ok(serde_json::Value::Null) => Some(Properties::new()),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Unreadable frontmatter: {}", e);
            None
        }
    }
}

/// How aliases are merged into a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasOptions {
    /// Compare names case-sensitively
    pub case_sensitive: bool,
    /// Add a frontmatter block to notes that have none
    pub auto_create_frontmatter: bool,
}

impl AliasOptions {
    /// Options taken from `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            case_sensitive: settings.case_sensitive,
            auto_create_frontmatter: settings.auto_create_frontmatter,
        }
    }

    fn same_name(self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.to_lowercase() == b.to_lowercase()
        }
    }
}

/// Text of a scalar alias; YAML reads `aliases: [2024]` as a number
fn alias_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn existing_aliases(mapping: &Mapping) -> Vec<Value> {
    match mapping.get(ALIASES_KEY) {
        Some(Value::Sequence(items)) => items.clone(),
        Some(scalar) if alias_text(scalar).is_some() => vec![scalar.clone()],
        _ => Vec::new(),
    }
}

/// Add `names` to the aliases of the note at `path` with body `content`
///
/// Names equal to `note_name` or already present are skipped. A scalar
/// `aliases` value is promoted to a list. Returns the rewritten note, or
/// `None` when nothing had to change.
pub fn add_aliases(
    path: &str,
    content: &str,
    note_name: &str,
    names: &BTreeSet<String>,
    options: AliasOptions,
) -> Result<Option<String>> {
    let (mut mapping, body) = match split(content) {
        Some((yaml, body)) => (parse_mapping(path, yaml)?, body),
        None if options.auto_create_frontmatter => (Mapping::new(), content),
        None => {
            tracing::debug!("{} has no frontmatter, not creating one", path);
            return Ok(None);
        }
    };

    let mut aliases = existing_aliases(&mapping);
    let mut added = 0;

    for name in names {
        if options.same_name(name, note_name) {
            continue;
        }
        let present = aliases
            .iter()
            .filter_map(alias_text)
            .any(|alias| options.same_name(&alias, name));
        if present {
            continue;
        }
        aliases.push(Value::String(name.clone()));
        added += 1;
    }

    if added == 0 {
        return Ok(None);
    }

    mapping.insert(Value::String(ALIASES_KEY.to_string()), Value::Sequence(aliases));
    let yaml = serde_yaml::to_string(&mapping).map_err(|e| Error::frontmatter(path, e))?;

    Ok(Some(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{body}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    const DEFAULT: AliasOptions = AliasOptions {
        case_sensitive: false,
        auto_create_frontmatter: true,
    };

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn aliases_of(content: &str) -> Vec<String> {
        let props = properties(content).unwrap();
        match props.get("aliases") {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().unwrap().to_string())
                .collect(),
            other => panic!("unexpected aliases: {other:?}"),
        }
    }

    #[test]
    fn test_split() {
        let cases = [
            ("---\ntitle: a\n---\nbody\n", Some(("title: a\n", "body\n"))),
            ("---\n---\n", Some(("", ""))),
            ("---\r\ntitle: a\r\n---\r\nbody", Some(("title: a\r\n", "body"))),
            ("no frontmatter", None),
            ("---\nunterminated: true\n", None),
            ("----\nx: 1\n---\n", None),
        ];

        for (input, expected) in cases {
            assert_eq!(split(input), expected, "input: {input:?}");
        }
    }

    #[test]
    fn test_properties() {
        let props = properties("---\nexclude: true\ntags: [a]\n---\n").unwrap();
        assert_eq!(props.get("exclude"), Some(&serde_json::Value::Bool(true)));

        assert!(properties("plain note").is_none());
        assert!(properties("---\n[not, a, map]\n---\n").is_none());
        assert!(properties("---\n---\n").unwrap().is_empty());
    }

    #[test]
    fn test_add_to_existing_list() {
        let content = "---\ntitle: Note\naliases:\n  - First\n---\n# Body\n";
        let updated = add_aliases("b.md", content, "b", &names(&["a"]), DEFAULT)
            .unwrap()
            .unwrap();

        assert_eq!(aliases_of(&updated), ["First", "a"]);
        assert!(updated.starts_with("---\ntitle: Note\n"));
        assert!(updated.ends_with("---\n# Body\n"));
    }

    #[test]
    fn test_scalar_alias_is_promoted() {
        let content = "---\naliases: First\n---\n";
        let updated = add_aliases("b.md", content, "b", &names(&["a"]), DEFAULT)
            .unwrap()
            .unwrap();

        assert_eq!(aliases_of(&updated), ["First", "a"]);
    }

    #[test]
    fn test_existing_alias_is_not_duplicated() {
        let content = "---\naliases: [Old]\n---\n";
        let result = add_aliases("b.md", content, "b", &names(&["old"]), DEFAULT).unwrap();
        assert!(result.is_none());

        let sensitive = AliasOptions {
            case_sensitive: true,
            ..DEFAULT
        };
        let updated = add_aliases("b.md", content, "b", &names(&["old"]), sensitive)
            .unwrap()
            .unwrap();
        assert_eq!(aliases_of(&updated), ["Old", "old"]);
    }

    #[test]
    fn test_non_string_aliases_are_compared_as_text() {
        let content = "---\naliases: [2024, true]\n---\n";
        let result =
            add_aliases("b.md", content, "b", &names(&["2024", "TRUE"]), DEFAULT).unwrap();
        assert!(result.is_none());

        let scalar = "---\naliases: 2024\n---\n";
        let updated = add_aliases("b.md", scalar, "b", &names(&["a"]), DEFAULT)
            .unwrap()
            .unwrap();
        assert_eq!(updated, "---\naliases:\n- 2024\n- a\n---\n");
    }

    #[test]
    fn test_current_name_is_skipped() {
        let result = add_aliases("B.md", "---\n---\n", "B", &names(&["b"]), DEFAULT).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_creates_frontmatter_when_missing() {
        let updated = add_aliases("b.md", "# Body\n", "b", &names(&["a"]), DEFAULT)
            .unwrap()
            .unwrap();

        assert_eq!(updated, "---\naliases:\n- a\n---\n# Body\n");
    }

    #[test]
    fn test_missing_frontmatter_left_alone() {
        let options = AliasOptions {
            auto_create_frontmatter: false,
            ..DEFAULT
        };
        let result = add_aliases("b.md", "# Body\n", "b", &names(&["a"]), options).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let err = add_aliases("b.md", "---\na: [\n---\n", "b", &names(&["a"]), DEFAULT)
            .unwrap_err();
        assert!(matches!(err, Error::Frontmatter { .. }));
    }
}
