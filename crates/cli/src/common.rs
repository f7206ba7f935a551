//! Common types shared across CLI commands

use alias_history_config::Settings;
use alias_history_core::VaultPath;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{CommandError, Result};

/// Runtime context for CLI commands
///
/// Holds the canonical vault root, the loaded settings and the file they were
/// loaded from (or will be saved to).
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Shared settings
    pub settings: Arc<Settings>,
    vault_root: PathBuf,
    settings_path: PathBuf,
}

impl RuntimeContext {
    /// Create a context for the vault at `vault`
    ///
    /// # Errors
    ///
    /// Returns an error if the vault directory does not exist.
    pub fn new(vault: &Path, settings: Settings, settings_path: PathBuf) -> Result<Self> {
        let vault_root = resolve_vault(vault)?;
        Ok(Self {
            settings: Arc::new(settings),
            vault_root,
            settings_path,
        })
    }

    /// Canonical vault root
    #[inline]
    pub fn vault_root(&self) -> &Path {
        &self.vault_root
    }

    /// Settings file location
    #[inline]
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Convert a user-supplied file argument into a vault path
    ///
    /// Absolute paths must lie inside the vault. Relative paths are taken
    /// relative to the current directory when that file exists, otherwise
    /// relative to the vault root.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is outside the vault.
    pub fn vault_path(&self, file: &Path) -> Result<VaultPath> {
        let absolute = if file.is_absolute() {
            file.to_path_buf()
        } else if file.exists() {
            std::env::current_dir()?.join(file)
        } else {
            return Ok(VaultPath::new(file.to_string_lossy().into_owned()));
        };

        let absolute = fs::canonicalize(&absolute).unwrap_or(absolute);
        VaultPath::from_fs_path(&self.vault_root, &absolute)
            .map_err(|_| CommandError::path_not_in_vault(absolute, self.vault_root.clone()))
    }
}

/// Canonicalize a vault directory
///
/// # Errors
///
/// Returns `VaultNotFound` if `vault` is not an existing directory.
pub fn resolve_vault(vault: &Path) -> Result<PathBuf> {
    if !vault.is_dir() {
        return Err(CommandError::VaultNotFound(vault.to_path_buf()));
    }
    fs::canonicalize(vault).map_err(|source| CommandError::InvalidPath {
        path: vault.display().to_string(),
        source,
    })
}
