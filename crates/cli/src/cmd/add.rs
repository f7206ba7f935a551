//! Add command implementation
//!
//! Records aliases on a note immediately, bypassing rename detection.

use alias_history_core::AliasProcessor;
use alias_history_engine::FrontmatterAliasProcessor;
use clap::Args;
use owo_colors::OwoColorize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Add command
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Note to update
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Names to add as aliases
    #[arg(value_name = "NAME", required = true)]
    pub names: Vec<String>,
}

impl Command for AddCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let target = context.vault_path(&self.file)?;
        let names: BTreeSet<String> = self
            .names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();

        if names.is_empty() {
            println!("{}", "Nothing to add".dimmed());
            return Ok(());
        }

        let processor = FrontmatterAliasProcessor::new(context.vault_root(), &context.settings);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(processor.process_aliases(target.as_str(), &names))?;

        println!("{} {}", "Updated".bright_green().bold(), target);
        Ok(())
    }
}
