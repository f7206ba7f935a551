//! Settings file locations inside a vault
//!
//! Settings live next to the notes they govern:
//! - `<vault>/.alias-history.toml` (preferred)
//! - `<vault>/.obsidian/plugins/alias-filename-history/data.json` (written by
//!   the vault plugin, picked up so both can share one configuration)

use std::path::{Path, PathBuf};

/// Name of the TOML settings file at the vault root
pub const SETTINGS_FILE_NAME: &str = ".alias-history.toml";

/// Path of the TOML settings file for `vault`
#[must_use]
pub fn default_settings_file(vault: &Path) -> PathBuf {
    vault.join(SETTINGS_FILE_NAME)
}

/// Path of the plugin's JSON settings for `vault`
#[must_use]
pub fn plugin_settings_file(vault: &Path) -> PathBuf {
    vault
        .join(".obsidian")
        .join("plugins")
        .join("alias-filename-history")
        .join("data.json")
}

/// Pick the settings file to use for `vault`
///
/// Returns the first existing candidate, or the TOML location when neither
/// exists yet.
#[must_use]
pub fn resolve_settings_file(vault: &Path) -> PathBuf {
    let toml = default_settings_file(vault);
    if toml.exists() {
        return toml;
    }

    let plugin = plugin_settings_file(vault);
    if plugin.exists() {
        return plugin;
    }

    toml
}
