//! Vault path utilities
//!
//! Vault paths are relative, slash-separated strings such as
//! `projects/alpha/index.md`. They never start with a slash and use `/` on
//! every platform, which keeps them comparable with the patterns stored in
//! settings.
//!
//! # Examples
//!
//! ```
//! use alias_history_core::path::{basename, file_stem, immediate_parent_name};
//!
//! assert_eq!(basename("notes/old/index.md"), "index.md");
//! assert_eq!(file_stem("notes/old/index.md"), "index");
//! assert_eq!(immediate_parent_name("notes/old/index.md"), "old");
//! assert_eq!(immediate_parent_name("index.md"), "");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Final slash-separated segment of `path`
///
/// Extension handling is left to the caller, see [`file_stem`].
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Name of the folder directly containing `path`
///
/// Returns an empty string for root-level files.
pub fn immediate_parent_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => basename(&path[..idx]),
        None => "",
    }
}

/// Base name without its extension
///
/// The extension starts at the last dot of the final segment. A leading dot
/// (`.hidden`) does not start an extension.
pub fn file_stem(path: &str) -> &str {
    let name = basename(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Extension of the final segment without the dot, empty when there is none
pub fn extension(path: &str) -> &str {
    let name = basename(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx + 1..],
        _ => "",
    }
}

/// A path relative to the vault root
///
/// # Examples
///
/// ```
/// use alias_history_core::path::VaultPath;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = VaultPath::from_fs_path(Path::new("/vault"), Path::new("/vault/notes/a.md"))?;
/// assert_eq!(path.as_str(), "notes/a.md");
/// assert_eq!(path.parent_name(), "notes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VaultPath(String);

impl VaultPath {
    /// Wrap an already vault-relative path
    ///
    /// Backslashes are normalized to `/` and a leading `/` is dropped.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into().replace('\\', "/");
        match path.strip_prefix('/') {
            Some(stripped) => VaultPath(stripped.to_string()),
            None => VaultPath(path),
        }
    }

    /// Build a vault path from a filesystem path under `root`
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not under `root` or is not valid UTF-8.
    pub fn from_fs_path(root: &Path, path: &Path) -> Result<Self> {
        let rel = path
            .strip_prefix(root)
            .map_err(|_| Error::InvalidPathPrefix {
                path: Arc::new(path.to_path_buf()),
                base: Arc::new(root.to_path_buf()),
            })?;

        let mut segments = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment.to_str().ok_or_else(|| {
                        Error::Path(format!("non UTF-8 path: {}", path.display()))
                    })?;
                    segments.push(segment);
                }
                Component::CurDir => {}
                _ => {
                    return Err(Error::Path(format!(
                        "unexpected component in {}",
                        path.display()
                    )));
                }
            }
        }

        Ok(VaultPath(segments.join("/")))
    }

    /// Resolve against the vault root
    pub fn to_fs_path(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }

    /// Get the underlying string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final segment including extension
    pub fn basename(&self) -> &str {
        basename(&self.0)
    }

    /// Final segment without extension
    pub fn file_stem(&self) -> &str {
        file_stem(&self.0)
    }

    /// Extension without the dot
    pub fn extension(&self) -> &str {
        extension(&self.0)
    }

    /// Name of the directly containing folder, empty at the vault root
    pub fn parent_name(&self) -> &str {
        immediate_parent_name(&self.0)
    }

    /// True when any segment starts with a dot (`.obsidian`, `.trash`, ...)
    pub fn is_hidden(&self) -> bool {
        self.0.split('/').any(|seg| seg.starts_with('.'))
    }

    /// Append a relative suffix
    pub fn join(&self, rel: &str) -> Self {
        if self.0.is_empty() {
            VaultPath::new(rel)
        } else {
            VaultPath(format!("{}/{}", self.0, rel.trim_start_matches('/')))
        }
    }
}

impl std::fmt::Display for VaultPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VaultPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
