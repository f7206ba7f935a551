//! Alias persistence for notes on disk
//!
//! [`FrontmatterAliasProcessor`] writes queued names into the `aliases`
//! property of a note, and [`VaultMetadata`] reads properties for the
//! exclude-property filter.

use crate::frontmatter::{self, AliasOptions};
use alias_history_config::Settings;
use alias_history_core::path::file_stem;
use alias_history_core::{AliasProcessor, Error, MetadataProvider, Properties, Result, VaultPath};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Writes historical names into note frontmatter
///
/// The note is rewritten only when at least one name was added. Names equal
/// to the note's current name or already present as an alias are skipped.
#[derive(Debug, Clone)]
pub struct FrontmatterAliasProcessor {
    root: PathBuf,
    options: AliasOptions,
}

impl FrontmatterAliasProcessor {
    /// Create a processor for the vault at `root`
    pub fn new(root: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            root: root.into(),
            options: AliasOptions::from_settings(settings),
        }
    }
}

#[async_trait]
impl AliasProcessor for FrontmatterAliasProcessor {
    async fn process_aliases(
        &self,
        target_path: &str,
        historical_names: &BTreeSet<String>,
    ) -> Result<()> {
        let fs_path = VaultPath::new(target_path).to_fs_path(&self.root);

        let content = tokio::fs::read_to_string(&fs_path)
            .await
            .map_err(|source| Error::FileRead {
                path: fs_path.clone(),
                source,
            })?;

        let note_name = file_stem(target_path);
        let Some(updated) = frontmatter::add_aliases(
            target_path,
            &content,
            note_name,
            historical_names,
            self.options,
        )?
        else {
            tracing::debug!("No new aliases for {}", target_path);
            return Ok(());
        };

        tokio::fs::write(&fs_path, updated)
            .await
            .map_err(|source| Error::FileWrite {
                path: fs_path.clone(),
                source,
            })?;

        tracing::info!(
            "Added aliases {:?} to {}",
            historical_names,
            target_path
        );
        Ok(())
    }
}

/// Reads note properties from files in a vault
#[derive(Debug, Clone)]
pub struct VaultMetadata {
    root: PathBuf,
}

impl VaultMetadata {
    /// Create a provider for the vault at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MetadataProvider for VaultMetadata {
    fn frontmatter(&self, path: &str) -> Option<Properties> {
        let fs_path = VaultPath::new(path).to_fs_path(&self.root);
        match std::fs::read_to_string(&fs_path) {
            Ok(content) => frontmatter::properties(&content),
            Err(e) => {
                tracing::debug!("Cannot read {}: {}", fs_path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn test_process_aliases_writes_frontmatter() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("notes")).unwrap();
        let note = temp.path().join("notes/New.md");
        fs::write(&note, "---\ntags: [x]\n---\nBody\n").unwrap();

        let processor = FrontmatterAliasProcessor::new(temp.path(), &Settings::default());
        processor
            .process_aliases("notes/New.md", &names(&["Old"]))
            .await
            .unwrap();

        let content = fs::read_to_string(&note).unwrap();
        assert!(content.contains("aliases:\n- Old\n"));
        assert!(content.ends_with("---\nBody\n"));
    }

    #[tokio::test]
    async fn test_process_aliases_skips_current_name() {
        let temp = TempDir::new().unwrap();
        let note = temp.path().join("Same.md");
        fs::write(&note, "Body\n").unwrap();

        let processor = FrontmatterAliasProcessor::new(temp.path(), &Settings::default());
        processor
            .process_aliases("Same.md", &names(&["same"]))
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(&note).unwrap(), "Body\n");
    }

    #[tokio::test]
    async fn test_process_aliases_missing_file() {
        let temp = TempDir::new().unwrap();
        let processor = FrontmatterAliasProcessor::new(temp.path(), &Settings::default());

        let err = processor
            .process_aliases("gone.md", &names(&["a"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_vault_metadata() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "---\nprivate: true\n---\n").unwrap();

        let metadata = VaultMetadata::new(temp.path());
        let props = metadata.frontmatter("a.md").unwrap();
        assert_eq!(props.get("private"), Some(&serde_json::Value::Bool(true)));
        assert!(metadata.frontmatter("missing.md").is_none());
    }
}
