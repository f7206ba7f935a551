//! Base error types for alias-history
//!
//! This module provides the foundation error types that all crates can use.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading a note
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a note
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path is not under the vault root
    #[error("Path {} is not under vault root {}", path.display(), base.display())]
    InvalidPathPrefix {
        path: Arc<PathBuf>,
        base: Arc<PathBuf>,
    },

    /// Path cannot be represented as a vault path
    #[error("Path error: {0}")]
    Path(String),

    /// Settings could not be read, parsed or written
    #[error("Configuration error: {0}")]
    Config(String),

    /// Frontmatter block could not be parsed or serialized
    #[error("Frontmatter error in {path}: {message}")]
    Frontmatter { path: String, message: String },

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a frontmatter error for the note at `path`
    pub fn frontmatter(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Frontmatter {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
