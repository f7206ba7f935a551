//! Check command implementation
//!
//! Shows how a rename would be classified without touching any note.

use alias_history_core::RenamedFile;
use alias_history_engine::{ChangeKind, Classification, VaultMetadata, classify};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Check command
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Path before the rename
    #[arg(value_name = "OLD")]
    pub old: PathBuf,

    /// Path after the rename
    #[arg(value_name = "NEW")]
    pub new: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct CheckReport {
    old_path: String,
    new_path: String,
    tracked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl CheckReport {
    fn new(old_path: String, new_path: String, classification: &Classification) -> Self {
        let mut report = Self {
            old_path,
            new_path,
            tracked: false,
            kind: None,
            alias: None,
            reason: None,
        };

        match classification {
            Classification::Track(candidate) => {
                report.tracked = true;
                report.kind = Some(match candidate.kind {
                    ChangeKind::Name => "name",
                    ChangeKind::Folder => "folder",
                });
                report.alias = Some(candidate.historical_name.clone());
            }
            Classification::Skip(reason) => report.reason = Some(reason.to_string()),
        }

        report
    }
}

impl Command for CheckCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let old = context.vault_path(&self.old)?;
        let new = context.vault_path(&self.new)?;

        let file = RenamedFile::from_path(new.as_str());
        let metadata = VaultMetadata::new(context.vault_root());
        let classification = classify(old.as_str(), &file, &context.settings, &metadata);

        let report = CheckReport::new(old.to_string(), new.to_string(), &classification);
        if self.json {
            let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            println!("{json}");
        } else {
            display(&report);
        }

        Ok(())
    }
}

fn display(report: &CheckReport) {
    println!(
        "{} {} {}",
        report.old_path.dimmed(),
        "→".dimmed(),
        report.new_path
    );

    match (&report.alias, &report.reason) {
        (Some(alias), _) => println!(
            "  {} '{}' ({} change)",
            "track".bright_green().bold(),
            alias,
            report.kind.unwrap_or("name")
        ),
        (None, Some(reason)) => println!("  {} {}", "skip".yellow().bold(), reason),
        (None, None) => {}
    }
}
