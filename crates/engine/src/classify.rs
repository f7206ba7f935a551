//! Rename classification
//!
//! Decides whether a rename changed a note's name, moved a tracked file into a
//! renamed folder, or should be ignored. Filters run in a fixed priority
//! order and the first one that rejects wins:
//!
//! 1. tracked extension
//! 2. name / folder change detection
//! 3. exclude property
//! 4. include folders
//! 5. exclude folders (with the tracked-file carve-out for `/*` patterns)
//! 6. ignore regexes

use crate::filter::{is_direct_child_of_wildcard, is_excluded, is_in_folder, matches_any_regex};
use alias_history_config::Settings;
use alias_history_core::path::{file_stem, immediate_parent_name};
use alias_history_core::{MetadataProvider, RenamedFile};
use std::fmt;

/// What kind of change produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The file's base name changed
    Name,
    /// Only the immediate parent folder's name changed
    Folder,
}

/// A historical name worth preserving as an alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Whether the file or its folder was renamed
    pub kind: ChangeKind,
    /// Old base name (name change) or old parent folder name (folder change)
    pub historical_name: String,
}

/// Why a rename was not tracked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Extension is not in `fileExtensions`
    UntrackedExtension,
    /// Neither base name nor parent folder name changed
    Unchanged,
    /// The exclude property is `true` in the note's frontmatter
    ExcludedByProperty,
    /// The file is outside every include folder
    NotInIncludedFolder,
    /// The file matched this exclude pattern
    ExcludedFolder(String),
    /// A folder change on a file that is not the tracked folder file
    FolderNotTracked,
    /// A folder change to or from the vault root
    RootLevelFolder,
    /// An old or new name matched an ignore regex
    IgnoredByRegex,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UntrackedExtension => write!(f, "extension is not tracked"),
            Self::Unchanged => write!(f, "name and folder unchanged"),
            Self::ExcludedByProperty => write!(f, "excluded by property"),
            Self::NotInIncludedFolder => write!(f, "not in an included folder"),
            Self::ExcludedFolder(pattern) => write!(f, "excluded by folder pattern '{pattern}'"),
            Self::FolderNotTracked => write!(f, "folder renames are not tracked for this file"),
            Self::RootLevelFolder => write!(f, "moved to or from the vault root"),
            Self::IgnoredByRegex => write!(f, "matched an ignore regex"),
        }
    }
}

/// Result of classifying one rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Queue `Candidate::historical_name` as an alias
    Track(Candidate),
    /// Ignore the rename
    Skip(SkipReason),
}

impl Classification {
    /// The candidate, if the rename is tracked
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Self::Track(candidate) => Some(candidate),
            Self::Skip(_) => None,
        }
    }

    /// Consume into the candidate, if the rename is tracked
    pub fn into_candidate(self) -> Option<Candidate> {
        match self {
            Self::Track(candidate) => Some(candidate),
            Self::Skip(_) => None,
        }
    }
}

/// Classify the rename of `old_path` to `file`
///
/// `metadata` is only consulted when an exclude property is configured and
/// the rename is otherwise a change.
pub fn classify<M>(
    old_path: &str,
    file: &RenamedFile,
    settings: &Settings,
    metadata: &M,
) -> Classification
where
    M: MetadataProvider + ?Sized,
{
    use Classification::{Skip, Track};

    if !settings.tracks_extension(&file.extension) {
        return Skip(SkipReason::UntrackedExtension);
    }

    let old_basename = file_stem(old_path);
    let new_basename = file.basename.as_str();
    let old_parent = immediate_parent_name(old_path);
    let new_parent = immediate_parent_name(&file.path);

    let is_name_change = !settings.names_equal(old_basename, new_basename);
    let is_folder_change = old_parent != new_parent && !is_name_change;

    if !is_name_change && !is_folder_change {
        return Skip(SkipReason::Unchanged);
    }

    if let Some(property) = settings.exclude_property()
        && metadata
            .frontmatter(&file.path)
            .is_some_and(|fm| fm.get(property) == Some(&serde_json::Value::Bool(true)))
    {
        return Skip(SkipReason::ExcludedByProperty);
    }

    if !settings.include_folders.is_empty()
        && !settings
            .include_folders
            .iter()
            .any(|folder| is_in_folder(&file.path, folder))
    {
        return Skip(SkipReason::NotInIncludedFolder);
    }

    let is_tracked_folder_file = settings
        .tracked_folder_file()
        .is_some_and(|name| settings.names_equal(new_basename, name));

    for pattern in &settings.exclude_folders {
        if !is_excluded(&file.path, pattern) {
            continue;
        }
        if is_folder_change
            && is_tracked_folder_file
            && is_direct_child_of_wildcard(&file.path, pattern)
        {
            continue;
        }
        return Skip(SkipReason::ExcludedFolder(pattern.clone()));
    }

    let ignored = |candidates: [&str; 2]| matches_any_regex(&candidates, &settings.ignore_regexes);

    if is_name_change {
        if ignored([old_basename, new_basename]) {
            return Skip(SkipReason::IgnoredByRegex);
        }
        return Track(Candidate {
            kind: ChangeKind::Name,
            historical_name: old_basename.to_string(),
        });
    }

    if !is_tracked_folder_file {
        return Skip(SkipReason::FolderNotTracked);
    }
    if old_parent.is_empty() || new_parent.is_empty() {
        return Skip(SkipReason::RootLevelFolder);
    }
    if ignored([old_parent, new_parent]) {
        return Skip(SkipReason::IgnoredByRegex);
    }

    Track(Candidate {
        kind: ChangeKind::Folder,
        historical_name: old_parent.to_string(),
    })
}
