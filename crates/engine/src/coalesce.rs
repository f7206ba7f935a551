//! Debounce coalescing of alias writes
//!
//! Every qualifying rename arms a timer for the file's current path. A rename
//! of the same file before the timer fires cancels that timer, carries the
//! originally queued name over to the new path and arms a fresh timer, so a
//! burst of renames produces one alias write for the name the file had
//! before the burst.
//!
//! Timers are tokio tasks that sleep and then post an [`Expired`] message into
//! a channel owned by the [`Coalescer`]. The owner drains that channel on the
//! same task that handles renames, which keeps every map mutation serialized.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to an armed timer
#[derive(Debug)]
pub struct TimerHandle {
    id: u64,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Identifier carried by this timer's [`Expired`] message
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Cancel the timer
    ///
    /// Cancelling a timer that already fired or was already cancelled is a
    /// no-op.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

/// Message posted by a timer when its quiet period elapsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expired {
    timer_id: u64,
    path: String,
}

impl Expired {
    /// Path the timer was armed for
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A scheduled alias write
#[derive(Debug)]
pub struct PendingAlias {
    /// Names to record; always the single earliest name of the window
    pub historical_names: BTreeSet<String>,
    /// Path the file had when the timer was last armed
    pub current_path: String,
    timer: TimerHandle,
}

impl PendingAlias {
    /// The queued name
    pub fn historical_name(&self) -> Option<&str> {
        self.historical_names.iter().next().map(String::as_str)
    }

    /// Timer currently armed for this entry
    pub fn timer(&self) -> &TimerHandle {
        &self.timer
    }
}

/// An alias write whose quiet period elapsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueAliases {
    /// Path of the file to update
    pub path: String,
    /// Names to add as aliases
    pub historical_names: BTreeSet<String>,
}

/// Collapses bursts of renames into one pending alias write per file
pub struct Coalescer {
    pending: HashMap<String, PendingAlias>,
    timeout: Duration,
    expired_tx: mpsc::UnboundedSender<Expired>,
    expired_rx: mpsc::UnboundedReceiver<Expired>,
    next_timer_id: u64,
}

impl Coalescer {
    /// Create a coalescer whose timers wait `timeout`
    pub fn new(timeout: Duration) -> Self {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        Self {
            pending: HashMap::new(),
            timeout,
            expired_tx,
            expired_rx,
            next_timer_id: 0,
        }
    }

    /// Queue `historical_name` for the file renamed from `old_path` to `new_path`
    ///
    /// If the file already has a pending entry (under either path) its timer is
    /// cancelled and its queued name is kept instead of `historical_name`.
    /// Returns the name that ended up queued.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, old_path: &str, new_path: &str, historical_name: String) -> String {
        let existing = match self.pending.remove(new_path) {
            Some(entry) => Some(entry),
            None => self.pending.remove(old_path),
        };

        let name = match existing {
            Some(entry) => {
                entry.timer.cancel();
                let carried = entry
                    .historical_names
                    .into_iter()
                    .next()
                    .unwrap_or(historical_name);
                debug!(
                    "Renamed again before timeout: {} -> {}, keeping '{}'",
                    old_path, new_path, carried
                );
                carried
            }
            None => historical_name,
        };

        let timer = self.arm(new_path);
        self.pending.insert(
            new_path.to_string(),
            PendingAlias {
                historical_names: BTreeSet::from([name.clone()]),
                current_path: new_path.to_string(),
                timer,
            },
        );

        name
    }

    fn arm(&mut self, path: &str) -> TimerHandle {
        self.next_timer_id += 1;
        let id = self.next_timer_id;
        let tx = self.expired_tx.clone();
        let timeout = self.timeout;
        let path = path.to_string();

        let task = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            // The receiver lives as long as the coalescer
            let _ = tx.send(Expired { timer_id: id, path });
        });

        TimerHandle { id, task }
    }

    /// Wait for the next timer to fire
    pub async fn next_expired(&mut self) -> Expired {
        match self.expired_rx.recv().await {
            Some(expired) => expired,
            // Unreachable while `self` holds a sender
            None => std::future::pending().await,
        }
    }

    /// Remove and return the entry whose timer produced `expired`
    ///
    /// Returns `None` for stale expirations, i.e. timers that were replaced
    /// after posting their message.
    pub fn take_expired(&mut self, expired: &Expired) -> Option<DueAliases> {
        let is_current = self
            .pending
            .get(&expired.path)
            .is_some_and(|entry| entry.timer.id == expired.timer_id);

        if !is_current {
            debug!("Ignoring stale timer for {}", expired.path);
            return None;
        }

        let entry = self.pending.remove(&expired.path)?;
        Some(DueAliases {
            path: entry.current_path,
            historical_names: entry.historical_names,
        })
    }

    /// Cancel every timer and drop all pending entries
    ///
    /// Returns how many entries were discarded.
    pub fn shutdown(&mut self) -> usize {
        for entry in self.pending.values() {
            entry.timer.cancel();
        }
        let discarded = self.pending.len();
        self.pending.clear();
        while self.expired_rx.try_recv().is_ok() {}
        discarded
    }

    /// Pending entry for `path`
    pub fn get(&self, path: &str) -> Option<&PendingAlias> {
        self.pending.get(path)
    }

    /// Whether `path` has a pending entry
    pub fn contains(&self, path: &str) -> bool {
        self.pending.contains_key(path)
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Drop for Coalescer {
    fn drop(&mut self) {
        for entry in self.pending.values() {
            entry.timer.cancel();
        }
    }
}
