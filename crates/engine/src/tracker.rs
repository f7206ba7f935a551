//! Rename tracking
//!
//! [`AliasTracker`] ties classification and coalescing together: every rename
//! is classified, tracked candidates are queued in the [`Coalescer`], and
//! expired entries are handed to the [`AliasProcessor`].
//!
//! The tracker is driven from a single task. Renames and timer expirations are
//! both delivered to [`AliasTracker::run`] as messages, so the pending map is
//! never touched concurrently.

use crate::classify::{Classification, classify};
use crate::coalesce::{Coalescer, Expired};
use alias_history_config::Settings;
use alias_history_core::{AliasProcessor, MetadataProvider, RenameEvent, RenamedFile};
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

enum Step {
    Rename(RenameEvent),
    Expired(Expired),
    Stop,
}

/// Turns renames into alias writes
pub struct AliasTracker<P, M>
where
    P: AliasProcessor,
    M: MetadataProvider,
{
    settings: Settings,
    processor: P,
    metadata: M,
    coalescer: Coalescer,
}

impl<P, M> AliasTracker<P, M>
where
    P: AliasProcessor,
    M: MetadataProvider,
{
    /// Create a tracker with no pending entries
    pub fn new(settings: Settings, processor: P, metadata: M) -> Self {
        let coalescer = Coalescer::new(settings.timeout());
        Self {
            settings,
            processor,
            metadata,
            coalescer,
        }
    }

    /// Handle one rename of `old_path` to `file`
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_rename(&mut self, file: &RenamedFile, old_path: &str) -> Classification {
        let classification = classify(old_path, file, &self.settings, &self.metadata);

        match &classification {
            Classification::Skip(reason) => {
                debug!("Skipping {} -> {}: {}", old_path, file.path, reason);
            }
            Classification::Track(candidate) => {
                let queued = self.coalescer.schedule(
                    old_path,
                    &file.path,
                    candidate.historical_name.clone(),
                );
                debug!(
                    "Queued '{}' for {} ({:?} change)",
                    queued, file.path, candidate.kind
                );
            }
        }

        classification
    }

    /// Wait for the next pending entry's timer to fire
    pub async fn next_expired(&mut self) -> Expired {
        self.coalescer.next_expired().await
    }

    /// Process the entry whose timer produced `expired`
    ///
    /// The entry is removed before the processor runs. Processor failures are
    /// logged and do not stop the tracker. Returns whether an entry was
    /// processed; stale expirations return `false`.
    pub async fn fire(&mut self, expired: &Expired) -> bool {
        let Some(due) = self.coalescer.take_expired(expired) else {
            return false;
        };

        info!(
            "Recording {:?} as aliases of {}",
            due.historical_names, due.path
        );
        if let Err(e) = self
            .processor
            .process_aliases(&due.path, &due.historical_names)
            .await
        {
            error!("Error processing aliases for {}: {}", due.path, e);
        }

        true
    }

    /// Run until `events` closes or `shutdown` resolves
    ///
    /// Pending entries are discarded on exit without being processed.
    pub async fn run<F>(&mut self, mut events: mpsc::Receiver<RenameEvent>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let step = tokio::select! {
                event = events.recv() => match event {
                    Some(event) => Step::Rename(event),
                    None => Step::Stop,
                },
                expired = self.coalescer.next_expired() => Step::Expired(expired),
                () = &mut shutdown => Step::Stop,
            };

            match step {
                Step::Rename(event) => {
                    self.on_rename(&event.file, &event.old_path);
                }
                Step::Expired(expired) => {
                    self.fire(&expired).await;
                }
                Step::Stop => break,
            }
        }

        self.shutdown();
    }

    /// Cancel every timer and drop all pending entries
    ///
    /// Returns how many entries were discarded.
    pub fn shutdown(&mut self) -> usize {
        let discarded = self.coalescer.shutdown();
        if discarded > 0 {
            info!("Discarded {} pending alias update(s)", discarded);
        }
        discarded
    }

    /// Number of files with a pending alias write
    pub fn pending_count(&self) -> usize {
        self.coalescer.len()
    }

    /// Whether `path` has a pending alias write
    pub fn is_pending(&self, path: &str) -> bool {
        self.coalescer.contains(path)
    }

    /// Name queued for `path`
    pub fn pending_name(&self, path: &str) -> Option<&str> {
        self.coalescer.get(path)?.historical_name()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use alias_history_core::{NoMetadata, Result};
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, BTreeSet<String>)>>,
    }

    impl Recorder {
        fn calls(&self) -> Vec<(String, BTreeSet<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AliasProcessor for Recorder {
        async fn process_aliases(
            &self,
            target_path: &str,
            historical_names: &BTreeSet<String>,
        ) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((target_path.to_string(), historical_names.clone()));
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl AliasProcessor for Failing {
        async fn process_aliases(&self, _: &str, _: &BTreeSet<String>) -> Result<()> {
            Err(alias_history_core::Error::Message("disk full".to_string()))
        }
    }

    fn tracker(recorder: &Arc<Recorder>) -> AliasTracker<Arc<Recorder>, NoMetadata> {
        AliasTracker::new(Settings::default(), Arc::clone(recorder), NoMetadata)
    }

    fn set(name: &str) -> BTreeSet<String> {
        BTreeSet::from([name.to_string()])
    }

    #[tokio::test(start_paused = true)]
    async fn test_name_change_is_recorded_after_timeout() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = tracker(&recorder);
        let start = Instant::now();

        let result = tracker.on_rename(&RenamedFile::from_path("notes/b.md"), "notes/a.md");
        assert!(result.candidate().is_some());
        assert!(tracker.is_pending("notes/b.md"));
        assert_eq!(tracker.pending_name("notes/b.md"), Some("a"));

        let expired = tracker.next_expired().await;
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert!(tracker.fire(&expired).await);

        assert_eq!(recorder.calls(), [("notes/b.md".to_string(), set("a"))]);
        assert_eq!(tracker.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skipped_rename_schedules_nothing() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = tracker(&recorder);

        let result = tracker.on_rename(&RenamedFile::from_path("Real.md"), "Untitled.md");
        assert!(result.candidate().is_none());
        assert_eq!(tracker.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rename_back_records_original_name() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = tracker(&recorder);

        tracker.on_rename(&RenamedFile::from_path("b.md"), "a.md");
        tokio::time::sleep(Duration::from_secs(2)).await;
        tracker.on_rename(&RenamedFile::from_path("a.md"), "b.md");

        let expired = tracker.next_expired().await;
        tracker.fire(&expired).await;

        // A frontmatter processor skips this name since the note is called `a` again
        assert_eq!(recorder.calls(), [("a.md".to_string(), set("a"))]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_processor_error_is_contained() {
        let mut tracker = AliasTracker::new(Settings::default(), Failing, NoMetadata);
        tracker.on_rename(&RenamedFile::from_path("b.md"), "a.md");

        let expired = tracker.next_expired().await;
        assert!(tracker.fire(&expired).await);
        assert_eq!(tracker.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_processes_events_until_closed() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = tracker(&recorder);
        let (tx, rx) = mpsc::channel(8);

        tx.send(RenameEvent::new("x.md", "y.md")).await.unwrap();
        let sender = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            tx.send(RenameEvent::new("y.md", "z.md")).await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        tracker.run(rx, std::future::pending()).await;
        sender.await.unwrap();

        assert_eq!(recorder.calls(), [("z.md".to_string(), set("x"))]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_discards_pending() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = tracker(&recorder);
        let (tx, rx) = mpsc::channel(8);
        tx.send(RenameEvent::new("a.md", "b.md")).await.unwrap();

        let stop = tokio::time::sleep(Duration::from_secs(1));
        tracker.run(rx, stop).await;

        assert_eq!(tracker.pending_count(), 0);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(recorder.calls().is_empty());
        drop(tx);
    }
}
