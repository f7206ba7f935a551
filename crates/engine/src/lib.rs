//! # Alias History Engine
//!
//! Turns note renames into alias history.
//!
//! - **Filters**: folder patterns and ignore regexes
//! - **Classification**: deciding whether a rename is worth remembering
//! - **Coalescing**: collapsing rename bursts into one write per file
//! - **Frontmatter**: reading properties and merging aliases
//! - **Tracking**: the event loop tying it together

pub mod classify;
pub mod coalesce;
pub mod filter;
pub mod frontmatter;
pub mod processor;
pub mod tracker;

// Re-export error types from core
pub use alias_history_core::{Error, Result};

// Re-export commonly used types
pub use classify::{Candidate, ChangeKind, Classification, SkipReason, classify};
pub use coalesce::{Coalescer, DueAliases, Expired};
pub use processor::{FrontmatterAliasProcessor, VaultMetadata};
pub use tracker::AliasTracker;
