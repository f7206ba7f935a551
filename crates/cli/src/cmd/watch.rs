//! Watch command implementation
//!
//! Runs the rename tracker against a vault until interrupted.

use alias_history_engine::{AliasTracker, FrontmatterAliasProcessor, VaultMetadata};
use clap::Args;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tracing::warn;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::watcher::{CHANNEL_CAPACITY, VaultWatcher};

/// Watch a vault and record renamed notes' old names as aliases
#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Override the debounce timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl Command for WatchCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(self.watch(context))
    }
}

impl WatchCommand {
    async fn watch(&self, context: &RuntimeContext) -> Result<()> {
        let mut settings = (*context.settings).clone();
        if let Some(timeout) = self.timeout {
            settings.set_value("timeoutSeconds", &timeout.to_string())?;
        }

        let root = context.vault_root();
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let _watcher = VaultWatcher::start(root, tx)?;

        println!(
            "{} {} {}",
            "Watching".bright_green().bold(),
            root.display(),
            "(Ctrl-C to stop)".dimmed()
        );

        let processor = FrontmatterAliasProcessor::new(root, &settings);
        let mut tracker = AliasTracker::new(settings, processor, VaultMetadata::new(root));
        tracker.run(rx, interrupted()).await;

        println!("{}", "Stopped".dimmed());
        Ok(())
    }
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
