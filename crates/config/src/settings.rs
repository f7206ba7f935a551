//! Rename tracking settings
//!
//! This module handles loading and saving the settings that drive rename
//! classification and debouncing. Settings are stored as TOML
//! (`.alias-history.toml`) or as the JSON `data.json` written by the vault
//! plugin; the format is picked from the file extension.
//!
//! ```toml
//! ignoreRegexes = ["^_", "^Untitled$", "^Untitled \\d+$"]
//! timeoutSeconds = 5
//! caseSensitive = false
//! autoCreateFrontmatter = true
//! includeFolders = []
//! excludeFolders = ["templates/**", "daily/*"]
//! fileExtensions = ["md"]
//! trackFolderRenames = "index"
//! excludePropertyName = "skipRenameTracking"
//! ```

use crate::Result;
use alias_history_core::Error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Lowest timeout accepted by `set_value`
pub const MIN_TIMEOUT_SECONDS: u64 = 1;
/// Highest timeout accepted by `set_value`
pub const MAX_TIMEOUT_SECONDS: u64 = 20;

/// Rename tracking settings
///
/// Missing keys fall back to their defaults, so a partial file behaves like
/// the defaults overlaid with whatever it sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Regexes matched against old/new names; any match skips the rename
    #[serde(default = "default_ignore_regexes")]
    pub ignore_regexes: Vec<String>,

    /// Seconds a name must stay stable before aliases are written
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Compare names (and alias uniqueness) case-sensitively
    #[serde(default)]
    pub case_sensitive: bool,

    /// Create a frontmatter block when a note has none
    #[serde(default = "default_auto_create_frontmatter")]
    pub auto_create_frontmatter: bool,

    /// Only track files under these folders (empty = everywhere)
    #[serde(default)]
    pub include_folders: Vec<String>,

    /// Never track files under these folders; supports `/*` and `/**`
    #[serde(default)]
    pub exclude_folders: Vec<String>,

    /// Extensions (without dot) of files to track
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,

    /// File name whose parent folder renames are recorded, empty = disabled
    #[serde(default)]
    pub track_folder_renames: String,

    /// Boolean property that opts a note out of tracking, empty = disabled
    #[serde(default)]
    pub exclude_property_name: String,
}

fn default_ignore_regexes() -> Vec<String> {
    vec![
        "^_".to_string(),
        "^Untitled$".to_string(),
        r"^Untitled \d+$".to_string(),
    ]
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_auto_create_frontmatter() -> bool {
    true
}

fn default_file_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ignore_regexes: default_ignore_regexes(),
            timeout_seconds: default_timeout_seconds(),
            case_sensitive: false,
            auto_create_frontmatter: default_auto_create_frontmatter(),
            include_folders: Vec::new(),
            exclude_folders: Vec::new(),
            file_extensions: default_file_extensions(),
            track_folder_renames: String::new(),
            exclude_property_name: String::new(),
        }
    }
}

/// Keys accepted by [`Settings::set_value`], in display order
pub const SETTING_KEYS: &[&str] = &[
    "ignoreRegexes",
    "timeoutSeconds",
    "caseSensitive",
    "autoCreateFrontmatter",
    "includeFolders",
    "excludeFolders",
    "fileExtensions",
    "trackFolderRenames",
    "excludePropertyName",
];

impl Settings {
    /// Debounce window as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Name of the file whose folder renames are tracked, if configured
    pub fn tracked_folder_file(&self) -> Option<&str> {
        non_blank(&self.track_folder_renames)
    }

    /// Name of the exclusion property, if configured
    pub fn exclude_property(&self) -> Option<&str> {
        non_blank(&self.exclude_property_name)
    }

    /// Compare two names honoring `case_sensitive`
    pub fn names_equal(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.to_lowercase() == b.to_lowercase()
        }
    }

    /// Whether files with `extension` are tracked
    pub fn tracks_extension(&self, extension: &str) -> bool {
        self.file_extensions.iter().any(|ext| ext == extension)
    }

    /// Load settings from a file
    ///
    /// `.json` files are parsed as JSON, everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read settings file {}: {e}", path.display()))
        })?;

        if is_json(path) {
            Self::from_json_str(&content)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
        } else {
            Self::from_toml_str(&content)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
        }
    }

    /// Load settings, returning defaults when the file does not exist
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            tracing::debug!(
                "No settings at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// Parse settings from a TOML string
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing fails
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse settings TOML: {e}")))
    }

    /// Parse settings from a JSON string
    ///
    /// # Errors
    ///
    /// Returns error if JSON parsing fails
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse settings JSON: {e}")))
    }

    /// Save settings to a file, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns error if serialization or writing fails
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)
                .map_err(|e| Error::Config(format!("Failed to serialize settings: {e}")))?
        } else {
            toml::to_string_pretty(self)
                .map_err(|e| Error::Config(format!("Failed to serialize settings: {e}")))?
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!(
                    "Failed to create settings directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write settings file {}: {e}", path.display()))
        })?;

        Ok(())
    }

    /// Set one value from its textual form
    ///
    /// List values are comma-separated; items are trimmed and empty items
    /// dropped. Booleans accept `true`/`false`. The timeout is clamped to
    /// `MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS`.
    ///
    /// # Errors
    ///
    /// Returns error for unknown keys or values that do not parse
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "ignoreRegexes" => self.ignore_regexes = split_list(value),
            "timeoutSeconds" => {
                let secs: u64 = value.trim().parse().map_err(|_| {
                    Error::Config(format!("timeoutSeconds must be a whole number, got '{value}'"))
                })?;
                self.timeout_seconds = secs.clamp(MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS);
            }
            "caseSensitive" => self.case_sensitive = parse_bool(key, value)?,
            "autoCreateFrontmatter" => self.auto_create_frontmatter = parse_bool(key, value)?,
            "includeFolders" => self.include_folders = split_list(value),
            "excludeFolders" => self.exclude_folders = split_list(value),
            "fileExtensions" => self.file_extensions = split_list(value),
            "trackFolderRenames" => self.track_folder_renames = value.to_string(),
            "excludePropertyName" => self.exclude_property_name = value.to_string(),
            _ => {
                return Err(Error::Config(format!(
                    "Unknown setting '{key}'. Known settings: {}",
                    SETTING_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::Config(format!(
            "{key} must be true or false, got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(
            settings.ignore_regexes,
            vec!["^_", "^Untitled$", r"^Untitled \d+$"]
        );
        assert_eq!(settings.timeout_seconds, 5);
        assert!(!settings.case_sensitive);
        assert!(settings.auto_create_frontmatter);
        assert!(settings.include_folders.is_empty());
        assert!(settings.exclude_folders.is_empty());
        assert_eq!(settings.file_extensions, vec!["md"]);
        assert!(settings.tracked_folder_file().is_none());
        assert!(settings.exclude_property().is_none());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_toml_overlays_defaults() {
        let settings = Settings::from_toml_str(
            r#"
timeoutSeconds = 2
excludeFolders = ["templates/**"]
trackFolderRenames = "index"
"#,
        )
        .unwrap();

        assert_eq!(settings.timeout_seconds, 2);
        assert_eq!(settings.exclude_folders, vec!["templates/**"]);
        assert_eq!(settings.tracked_folder_file(), Some("index"));
        assert_eq!(settings.ignore_regexes, default_ignore_regexes());
        assert_eq!(settings.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_plugin_json() {
        let settings = Settings::from_json_str(
            r#"{
  "ignoreRegexes": ["^_"],
  "timeoutSeconds": 7,
  "caseSensitive": true,
  "autoCreateFrontmatter": false,
  "includeFolders": ["{vault}"],
  "excludeFolders": [],
  "fileExtensions": ["md", "canvas"],
  "trackFolderRenames": "",
  "excludePropertyName": "skipRenameTracking"
}"#,
        )
        .unwrap();

        assert_eq!(settings.timeout_seconds, 7);
        assert!(settings.case_sensitive);
        assert!(!settings.auto_create_frontmatter);
        assert!(settings.tracks_extension("canvas"));
        assert_eq!(settings.exclude_property(), Some("skipRenameTracking"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Settings::from_toml_str("timeoutSeconds = [[[");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn test_blank_optionals_are_disabled() {
        let settings = Settings {
            track_folder_renames: "   ".to_string(),
            exclude_property_name: String::new(),
            ..Settings::default()
        };
        assert!(settings.tracked_folder_file().is_none());
        assert!(settings.exclude_property().is_none());
    }

    #[test]
    fn test_names_equal() {
        let mut settings = Settings::default();
        assert!(settings.names_equal("Index", "index"));
        settings.case_sensitive = true;
        assert!(!settings.names_equal("Index", "index"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load_or_default(temp.path().join("missing.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_toml_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join(".alias-history.toml");
        let settings = Settings {
            exclude_folders: vec!["daily/*".to_string()],
            track_folder_renames: "index".to_string(),
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_save_and_load_json_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");
        let settings = Settings {
            case_sensitive: true,
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"caseSensitive\": true"));
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_set_value_lists_are_split_and_trimmed() {
        let mut settings = Settings::default();
        settings.set_value("excludeFolders", "a/*, b/**,").unwrap();
        assert_eq!(settings.exclude_folders, vec!["a/*", "b/**"]);

        settings.set_value("ignoreRegexes", "").unwrap();
        assert!(settings.ignore_regexes.is_empty());
    }

    #[test]
    fn test_set_value_timeout_is_clamped() {
        let mut settings = Settings::default();
        settings.set_value("timeoutSeconds", "60").unwrap();
        assert_eq!(settings.timeout_seconds, MAX_TIMEOUT_SECONDS);
        settings.set_value("timeoutSeconds", "0").unwrap();
        assert_eq!(settings.timeout_seconds, MIN_TIMEOUT_SECONDS);
        assert!(settings.set_value("timeoutSeconds", "soon").is_err());
    }

    #[test]
    fn test_set_value_bool_and_strings() {
        let mut settings = Settings::default();
        settings.set_value("caseSensitive", "true").unwrap();
        assert!(settings.case_sensitive);
        settings.set_value("autoCreateFrontmatter", "off").unwrap();
        assert!(!settings.auto_create_frontmatter);
        settings.set_value("trackFolderRenames", "index").unwrap();
        assert_eq!(settings.track_folder_renames, "index");
        assert!(settings.set_value("caseSensitive", "maybe").is_err());
    }

    #[test]
    fn test_set_value_unknown_key() {
        let mut settings = Settings::default();
        let err = settings.set_value("debounce", "3").unwrap_err();
        assert!(err.to_string().contains("Unknown setting 'debounce'"));
    }
}
