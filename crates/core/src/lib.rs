//! Core types and utilities for alias-history
//!
//! This is the foundation crate that the other alias-history crates depend on.
//! It provides:
//! - Vault path helpers (base name, parent folder name, `VaultPath`)
//! - The renamed-file descriptor delivered by the host
//! - Base error types
//! - Collaborator traits (`AliasProcessor`, `MetadataProvider`)
//!
//! This crate has no dependencies on other alias-history crates.

pub mod error;
pub mod file;
pub mod path;
pub mod traits;

pub use error::{Error, Result};
pub use file::{RenameEvent, RenamedFile};
pub use path::VaultPath;
pub use traits::{AliasProcessor, MetadataProvider, NoMetadata, Properties};
