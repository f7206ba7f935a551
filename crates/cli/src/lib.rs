//! alias-history CLI library
//!
//! All CLI logic lives here so it can be tested without spawning the binary.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;
pub mod watcher;

use alias_history_config::{Settings, resolve_settings_file};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use command::Command;
use common::RuntimeContext;

/// alias-history - keep renamed notes findable by their old names
#[derive(Parser)]
#[command(name = "alias-history")]
#[command(about = "Record old note names as aliases when notes are renamed")]
#[command(version)]
#[command(long_about = "Record old note names as aliases when notes are renamed

Watches a Markdown vault for renames and, once a file has stopped being
renamed for a few seconds, adds its previous name to the `aliases` list in
its YAML frontmatter.

Folder renames can be tracked too: configure `trackFolderRenames` with the
name of the file that stands for its folder (for example `index`).")]
pub struct Cli {
    /// Path to the vault (defaults to the current directory)
    #[arg(long, env = "ALIAS_HISTORY_VAULT", value_name = "DIR")]
    pub vault: Option<PathBuf>,

    /// Path to the settings file
    #[arg(long, env = "ALIAS_HISTORY_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file
    #[arg(long, env = "ALIAS_HISTORY_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Watch the vault and record aliases for renamed notes
    Watch(cmd::watch::WatchCommand),

    /// Show whether a rename would be recorded, and why
    #[command(long_about = "Show whether a rename would be recorded, and why

Paths may be absolute, relative to the current directory, or relative to the
vault root. No note is modified.

Examples:
  • alias-history check notes/Draft.md notes/Final.md
  • alias-history check projects/alpha/index.md projects/beta/index.md --json")]
    Check(cmd::check::CheckCommand),

    /// Add aliases to a note right away
    Add(cmd::add::AddCommand),

    /// Manage settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Settings management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective settings
    Show {
        /// Output in JSON format (default: TOML)
        #[arg(long)]
        json: bool,
    },

    /// Change one setting
    #[command(long_about = "Change one setting

List settings (ignoreRegexes, includeFolders, excludeFolders, fileExtensions)
take a comma-separated value; items are trimmed and empty items dropped.
timeoutSeconds is clamped to 1..=20.

Examples:
  • alias-history config set excludeFolders \"templates/**, archive/*\"
  • alias-history config set trackFolderRenames index
  • alias-history config set caseSensitive true")]
    Set {
        /// Setting name (camelCase)
        key: String,
        /// New value
        value: String,
    },

    /// List the setting names
    Keys,
}

fn execute_command(command: Commands, context: &RuntimeContext) -> Result<()> {
    match command {
        Commands::Watch(watch_cmd) => watch_cmd.execute(context)?,
        Commands::Check(check_cmd) => check_cmd.execute(context)?,
        Commands::Add(add_cmd) => add_cmd.execute(context)?,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init { force } => cmd::config::run_init(context, force)?,
            ConfigCommands::Show { json } => cmd::config::run_show(context, json)?,
            ConfigCommands::Set { key, value } => cmd::config::run_set(context, &key, &value)?,
            ConfigCommands::Keys => cmd::config::run_keys(),
        },
    }

    Ok(())
}

/// Settings file for `vault`, honoring an explicit `--config`
fn settings_path(explicit: Option<&Path>, vault: &Path) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => resolve_settings_file(vault),
    }
}

/// # Errors
///
/// Returns an error if:
/// - Logging initialization fails
/// - The vault does not exist
/// - The settings file exists but cannot be parsed
/// - Command execution fails
pub fn run(cli: Cli) -> Result<()> {
    alias_history_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    let vault = match cli.vault {
        Some(vault) => vault,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let settings_path = settings_path(cli.config.as_deref(), &vault);
    let settings = Settings::load_or_default(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    tracing::debug!("Using settings from {}", settings_path.display());

    let context = RuntimeContext::new(&vault, settings, settings_path)?;
    execute_command(cli.command, &context)
}
