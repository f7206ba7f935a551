//! Collaborator interfaces for the rename tracker
//!
//! The tracker never touches notes directly. Reading properties and writing
//! aliases go through these traits so the engine can be driven by a real vault
//! on disk or by in-memory fakes in tests.

use crate::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Frontmatter properties of a note, keyed by property name
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Persists historical names as aliases on a note
///
/// Implementations must be idempotent with respect to aliases that are
/// already present and must accept a single historical name.
///
/// # Examples
///
/// ```ignore
/// async fn record(processor: &dyn AliasProcessor) -> Result<()> {
///     let names = BTreeSet::from(["Old title".to_string()]);
///     processor.process_aliases("notes/New title.md", &names).await
/// }
/// ```
#[async_trait]
pub trait AliasProcessor: Send + Sync {
    /// Add `historical_names` as aliases of the note at `target_path`
    async fn process_aliases(
        &self,
        target_path: &str,
        historical_names: &BTreeSet<String>,
    ) -> Result<()>;
}

#[async_trait]
impl<P: AliasProcessor + ?Sized> AliasProcessor for Arc<P> {
    async fn process_aliases(
        &self,
        target_path: &str,
        historical_names: &BTreeSet<String>,
    ) -> Result<()> {
        (**self).process_aliases(target_path, historical_names).await
    }
}

/// Read access to note metadata
pub trait MetadataProvider {
    /// Frontmatter of the note at `path`, `None` when it has none
    fn frontmatter(&self, path: &str) -> Option<Properties>;
}

impl<M: MetadataProvider + ?Sized> MetadataProvider for Arc<M> {
    fn frontmatter(&self, path: &str) -> Option<Properties> {
        (**self).frontmatter(path)
    }
}

/// Metadata provider for vaults without properties
pub struct NoMetadata;

impl MetadataProvider for NoMetadata {
    fn frontmatter(&self, _path: &str) -> Option<Properties> {
        None
    }
}
