//! Descriptor of a file after a rename

use crate::path::{extension, file_stem};
use serde::{Deserialize, Serialize};

/// The new side of a rename event
///
/// Mirrors what a vault host reports for a renamed file: the full vault path,
/// the base name without extension, and the extension without its dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedFile {
    /// Vault-relative path after the rename
    pub path: String,
    /// Base name without extension
    pub basename: String,
    /// Extension without the leading dot
    pub extension: String,
}

impl RenamedFile {
    /// Describe the file at `path`, deriving base name and extension
    ///
    /// # Examples
    ///
    /// ```
    /// use alias_history_core::RenamedFile;
    ///
    /// let file = RenamedFile::from_path("notes/new/index.md");
    /// assert_eq!(file.basename, "index");
    /// assert_eq!(file.extension, "md");
    /// ```
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let basename = file_stem(&path).to_string();
        let extension = extension(&path).to_string();
        Self {
            path,
            basename,
            extension,
        }
    }
}

/// A rename reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEvent {
    /// The file as it is now
    pub file: RenamedFile,
    /// Vault-relative path before the rename
    pub old_path: String,
}

impl RenameEvent {
    /// Build an event from the old and new vault paths
    pub fn new(old_path: impl Into<String>, new_path: impl Into<String>) -> Self {
        Self {
            file: RenamedFile::from_path(new_path),
            old_path: old_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_root_level() {
        let file = RenamedFile::from_path("Untitled 2.md");
        assert_eq!(file.basename, "Untitled 2");
        assert_eq!(file.extension, "md");
        assert_eq!(file.path, "Untitled 2.md");
    }

    #[test]
    fn test_event_new() {
        let event = RenameEvent::new("x.md", "docs/y.md");
        assert_eq!(event.old_path, "x.md");
        assert_eq!(event.file.basename, "y");
    }
}
