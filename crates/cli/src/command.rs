//! Command trait for the alias-history CLI

use crate::common::RuntimeContext;
use crate::error::Result;

/// Trait for commands that operate on a vault
///
/// `execute` receives a [`RuntimeContext`] holding the vault root and the
/// loaded settings.
///
/// # Example
///
/// ```rust,ignore
/// use crate::command::Command;
/// use crate::common::RuntimeContext;
/// use crate::error::Result;
/// use clap::Args;
///
/// #[derive(Debug, Args)]
/// pub struct MyCommand {
///     #[arg(long)]
///     pub json: bool,
/// }
///
/// impl Command for MyCommand {
///     type Output = ();
///
///     fn execute(&self, context: &RuntimeContext) -> Result<()> {
///         // context.vault_root(), context.settings
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the command fails. Error messages should
    /// tell the user what went wrong.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
