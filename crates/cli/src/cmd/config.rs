//! Config command implementation
//!
//! Creates, shows and edits the settings file of a vault.

use alias_history_config::{SETTING_KEYS, Settings};
use owo_colors::OwoColorize;
use std::path::Path;

use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};

/// Write default settings to the context's settings file
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn run_init(context: &RuntimeContext, force: bool) -> Result<()> {
    let path = context.settings_path();
    if path.exists() && !force {
        return Err(CommandError::FileAlreadyExists(path.to_path_buf()));
    }

    Settings::default().save(path)?;
    println!("{} {}", "Created".bright_green().bold(), path.display());
    Ok(())
}

/// Print the effective settings
pub fn run_show(context: &RuntimeContext, json: bool) -> Result<()> {
    let rendered = render(&context.settings, json)?;

    let source = context.settings_path();
    let note = if source.exists() {
        source.display().to_string()
    } else {
        format!("{} (defaults, file not found)", source.display())
    };
    eprintln!("{} {}", "#".dimmed(), note.dimmed());
    println!("{rendered}");
    Ok(())
}

/// Change one setting and save the file
///
/// The settings are re-read from disk so that values not loaded into the
/// context are preserved.
pub fn run_set(context: &RuntimeContext, key: &str, value: &str) -> Result<()> {
    let path = context.settings_path();
    let settings = set_in_file(path, key, value)?;

    println!(
        "{} {} in {}",
        "Set".bright_green().bold(),
        key.bold(),
        path.display()
    );
    let values = serde_json::to_value(&settings).map_err(CommandError::config)?;
    if let Some(current) = values.get(key) {
        println!("  {key} = {current}");
    }
    Ok(())
}

/// Print the known setting keys
pub fn run_keys() {
    for key in SETTING_KEYS {
        println!("{key}");
    }
}

fn set_in_file(path: &Path, key: &str, value: &str) -> Result<Settings> {
    let mut settings = Settings::load_or_default(path)?;
    settings.set_value(key, value)?;
    settings.save(path)?;
    Ok(settings)
}

fn render(settings: &Settings, json: bool) -> Result<String> {
    let rendered = if json {
        serde_json::to_string_pretty(settings).map_err(CommandError::config)?
    } else {
        toml::to_string_pretty(settings).map_err(CommandError::config)?
    };
    Ok(rendered)
}
