//! Error types for CLI commands

use std::path::PathBuf;
use thiserror::Error;

/// Error data for `PathNotInVault`
///
/// Separated to allow boxing and keep `CommandError` small
#[derive(Debug)]
pub struct PathNotInVaultError {
    /// The path that is outside the vault
    pub path: PathBuf,
    /// The vault root
    pub vault: PathBuf,
}

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// The vault directory does not exist
    #[error("Vault not found: {0}")]
    VaultNotFound(PathBuf),

    /// Invalid path error
    #[error("Invalid path: {path}")]
    InvalidPath {
        /// The invalid path
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Path not inside the vault
    #[error("Path {} is not inside vault {}", .0.path.display(), .0.vault.display())]
    PathNotInVault(Box<PathNotInVaultError>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Settings file already exists
    #[error("File already exists: {0}")]
    FileAlreadyExists(PathBuf),

    /// Filesystem watcher error
    #[error("Watcher error: {0}")]
    WatcherError(#[from] notify::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<alias_history_core::Error> for CommandError {
    fn from(err: alias_history_core::Error) -> Self {
        match err {
            alias_history_core::Error::Config(_) => Self::config(err),
            other => Self::Other(other.into()),
        }
    }
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;

impl CommandError {
    /// Create a `PathNotInVault` error
    #[must_use]
    pub fn path_not_in_vault(path: PathBuf, vault: PathBuf) -> Self {
        Self::PathNotInVault(Box::new(PathNotInVaultError { path, vault }))
    }

    /// Create a `ConfigError` from any error type
    pub fn config<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::ConfigError(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_path_not_in_vault_error() {
        let error = CommandError::path_not_in_vault(
            PathBuf::from("/tmp/note.md"),
            PathBuf::from("/home/user/vault"),
        );

        let error_msg = error.to_string();
        assert!(error_msg.contains("/tmp/note.md"));
        assert!(error_msg.contains("/home/user/vault"));
        assert!(error_msg.contains("is not inside vault"));
    }

    #[test]
    fn test_vault_not_found_error() {
        let error = CommandError::VaultNotFound(PathBuf::from("/missing/vault"));
        assert!(error.to_string().contains("Vault not found: /missing/vault"));
    }

    #[test]
    fn test_invalid_path_error() {
        let io_error = io::Error::new(io::ErrorKind::InvalidInput, "invalid path");
        let error = CommandError::InvalidPath {
            path: "/bad/path".to_string(),
            source: io_error,
        };

        let error_msg = error.to_string();
        assert!(error_msg.contains("Invalid path"));
        assert!(error_msg.contains("/bad/path"));
    }

    #[test]
    fn test_core_config_error_conversion() {
        let core_error = alias_history_core::Error::Config("bad key".to_string());
        let error: CommandError = core_error.into();

        assert!(matches!(error, CommandError::ConfigError(_)));
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_core_error_conversion() {
        let core_error = alias_history_core::Error::Message("boom".to_string());
        let error: CommandError = core_error.into();

        assert!(matches!(error, CommandError::Other(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: CommandError = io_error.into();

        assert!(error.to_string().contains("IO error"));
    }

    #[test]
    fn test_anyhow_error_conversion() {
        let error: CommandError = anyhow::anyhow!("something went wrong").into();
        assert!(error.to_string().contains("something went wrong"));
    }
}
