//! Filesystem rename source for `watch`
//!
//! Uses `notify::RecommendedWatcher` on the vault root and forwards renames
//! into a tokio channel as [`RenameEvent`]s. A renamed folder is reported as
//! one event per file below it, since aliases are tracked per note.

use alias_history_core::{RenameEvent, VaultPath};
use notify::event::{ModifyKind, RenameMode};
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Capacity of the rename channel between the watcher thread and the tracker
pub const CHANNEL_CAPACITY: usize = 1024;

/// How long the source half of a split rename waits for its target
const PAIR_WINDOW: Duration = Duration::from_secs(1);

/// Live watch on a vault; stops when dropped
pub struct VaultWatcher {
    _watcher: notify::RecommendedWatcher,
}

impl VaultWatcher {
    /// Start watching `root`, sending renames to `events`
    ///
    /// # Errors
    ///
    /// Returns an error if the platform watcher cannot be created or cannot
    /// watch `root`.
    pub fn start(root: &Path, events: mpsc::Sender<RenameEvent>) -> notify::Result<Self> {
        let mut pairer = RenamePairer::new(root);

        let mut watcher = notify::RecommendedWatcher::new(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    for rename in pairer.accept(&event) {
                        if events.try_send(rename).is_err() {
                            warn!("Rename queue full or closed, dropping event");
                        }
                    }
                }
                Err(e) => warn!("Watch error: {}", e),
            },
            notify::Config::default(),
        )?;

        watcher.watch(root, RecursiveMode::Recursive)?;
        debug!("Watching {}", root.display());

        Ok(Self { _watcher: watcher })
    }
}

struct RenameSource {
    path: PathBuf,
    tracker: Option<usize>,
    seen: Instant,
}

/// Joins platform rename notifications into vault rename events
///
/// inotify reports a rename as a single `Both` event carrying both paths.
/// Windows sends `From` and then `To`. FSEvents sends `Any` for each side, so
/// the side whose path is gone is the source. Split halves are joined in
/// arrival order, and by tracker id when the backend sets one.
pub struct RenamePairer {
    root: PathBuf,
    source: Option<RenameSource>,
}

impl RenamePairer {
    /// Pairer for renames under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source: None,
        }
    }

    /// Feed one filesystem event; returns the renames it completes
    pub fn accept(&mut self, event: &notify::Event) -> Vec<RenameEvent> {
        let EventKind::Modify(ModifyKind::Name(mode)) = &event.kind else {
            return Vec::new();
        };
        let tracker = event.attrs.tracker();

        match (mode, event.paths.as_slice()) {
            (RenameMode::Both, [from, to]) => rename_events(&self.root, from, to),
            (RenameMode::From, [from]) => {
                self.hold(from, tracker);
                Vec::new()
            }
            (RenameMode::To, [to]) => self.complete(to, tracker),
            (RenameMode::Any | RenameMode::Other, [path]) => {
                if path.exists() {
                    self.complete(path, tracker)
                } else {
                    self.hold(path, tracker);
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn hold(&mut self, path: &Path, tracker: Option<usize>) {
        let previous = self.source.replace(RenameSource {
            path: path.to_path_buf(),
            tracker,
            seen: Instant::now(),
        });
        if let Some(previous) = previous {
            debug!("No rename target for {}", previous.path.display());
        }
    }

    fn complete(&mut self, to: &Path, tracker: Option<usize>) -> Vec<RenameEvent> {
        let Some(source) = self.source.take() else {
            debug!("No rename source for {}", to.display());
            return Vec::new();
        };

        if matches!((source.tracker, tracker), (Some(a), Some(b)) if a != b) {
            self.source = Some(source);
            return Vec::new();
        }
        if source.seen.elapsed() > PAIR_WINDOW {
            debug!("No rename target for {}", source.path.display());
            return Vec::new();
        }

        rename_events(&self.root, &source.path, to)
    }
}

/// Vault rename events for a move of `from` to `to`
fn rename_events(root: &Path, from: &Path, to: &Path) -> Vec<RenameEvent> {
    if from == to {
        return Vec::new();
    }

    let (old, new) = match (
        VaultPath::from_fs_path(root, from),
        VaultPath::from_fs_path(root, to),
    ) {
        (Ok(old), Ok(new)) => (old, new),
        (Err(e), _) | (_, Err(e)) => {
            debug!("Ignoring rename outside the vault: {}", e);
            return Vec::new();
        }
    };

    if old.is_hidden() || new.is_hidden() {
        return Vec::new();
    }

    if to.is_dir() {
        return folder_rename_events(to, &old, &new);
    }

    vec![RenameEvent::new(old.as_str(), new.as_str())]
}

/// One event per visible file under the renamed folder `dir`
fn folder_rename_events(dir: &Path, old: &VaultPath, new: &VaultPath) -> Vec<RenameEvent> {
    WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| relative_suffix(dir, entry.path()))
        .filter(|suffix| !VaultPath::new(suffix.as_str()).is_hidden())
        .map(|suffix| RenameEvent::new(old.join(&suffix).as_str(), new.join(&suffix).as_str()))
        .collect()
}

fn relative_suffix(dir: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(dir).ok()?;
    let segments: Option<Vec<&str>> = rel.iter().map(|s| s.to_str()).collect();
    Some(segments?.join("/"))
}
