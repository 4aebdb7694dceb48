//! Event coalescing and the trailing-edge debounce loop.

use super::event::FileEvent;
use super::size::ProjectStats;
use crate::tree::NodeMetadata;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

/// Coalesces pending events by path.
///
/// Paths keep their first-seen order. For a repeated path the newest event
/// supplies the id and metadata and the flags accumulate, so a create
/// followed by a remove stays visible as both.
#[derive(Debug, Default)]
pub struct ChangeBatcher {
    events: Vec<FileEvent>,
    index: HashMap<PathBuf, usize>,
}

impl ChangeBatcher {
    /// Create a new change batcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event to the batch.
    pub fn add(&mut self, event: FileEvent) {
        match self.index.get(&event.path) {
            Some(&i) => {
                let existing = &mut self.events[i];
                existing.flags |= event.flags;
                existing.id = event.id;
                existing.metadata = event.metadata;
            }
            None => {
                self.index.insert(event.path.clone(), self.events.len());
                self.events.push(event);
            }
        }
    }

    /// Take the current batch and reset.
    pub fn take(&mut self) -> Vec<FileEvent> {
        self.index.clear();
        std::mem::take(&mut self.events)
    }

    /// Get the number of pending paths.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Attach fresh metadata to every event whose path may still exist.
pub fn probe_metadata(mut batch: Vec<FileEvent>) -> Vec<FileEvent> {
    for event in &mut batch {
        event.metadata = if event.is_removal_only() {
            None
        } else {
            NodeMetadata::try_probe(&event.path)
        };
    }
    batch
}

/// Debounce loop: owns the pending buffer and the single flush deadline.
///
/// Every accepted event pushes the deadline to `now + interval`. When the
/// deadline passes, the coalesced batch is probed and delivered. The loop
/// ends when either channel closes; pending events are dropped then.
pub(crate) async fn debounce(
    mut raw: mpsc::UnboundedReceiver<FileEvent>,
    out: mpsc::Sender<Vec<FileEvent>>,
    stats: Arc<RwLock<ProjectStats>>,
) {
    let mut batcher = ChangeBatcher::new();
    let mut deadline: Option<Instant> = None;

    loop {
        let flush_at = deadline;

        tokio::select! {
            received = raw.recv() => match received {
                Some(event) => {
                    batcher.add(event);
                    deadline = Some(Instant::now() + stats.read().batch_interval);
                }
                None => break,
            },
            _ = sleep_until(flush_at.unwrap_or_else(Instant::now)), if flush_at.is_some() => {
                deadline = None;
                let batch = batcher.take();
                if batch.is_empty() {
                    continue;
                }

                let batch = match tokio::task::spawn_blocking(move || probe_metadata(batch)).await {
                    Ok(batch) => batch,
                    Err(e) => {
                        warn!(error = %e, "Metadata probe failed");
                        continue;
                    }
                };

                debug!(events = batch.len(), "Flushing change batch");
                if out.send(batch).await.is_err() {
                    break;
                }
            }
        }
    }

    debug!("Debounce loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watcher::EventFlags;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    fn ev(path: &str, flags: EventFlags, id: u64) -> FileEvent {
        FileEvent::new(path, flags, id)
    }

    #[test]
    fn test_change_batcher_deduplication() {
        let mut batcher = ChangeBatcher::new();
        batcher.add(ev("a.rs", EventFlags::MODIFIED, 1));
        batcher.add(ev("b.rs", EventFlags::CREATED, 2));
        batcher.add(ev("a.rs", EventFlags::MODIFIED, 3));

        assert_eq!(batcher.len(), 2);
        let batch = batcher.take();
        assert_eq!(batch[0].path, PathBuf::from("a.rs"));
        assert_eq!(batch[0].id, 3);
        assert_eq!(batch[1].path, PathBuf::from("b.rs"));
        assert!(batcher.is_empty());
    }

    #[test]
    fn test_flags_accumulate() {
        let mut batcher = ChangeBatcher::new();
        batcher.add(ev("tmp", EventFlags::CREATED, 1));
        batcher.add(ev("tmp", EventFlags::REMOVED, 2));

        let batch = batcher.take();
        assert!(batch[0].is_created());
        assert!(batch[0].is_removed());
    }

    #[test]
    fn test_probe_skips_removals() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("x.txt");
        fs::write(&file, "abc").unwrap();

        let batch = probe_metadata(vec![
            FileEvent::new(&file, EventFlags::MODIFIED, 1),
            FileEvent::new(temp_dir.path().join("gone"), EventFlags::REMOVED, 2),
        ]);

        assert_eq!(batch[0].metadata.as_ref().unwrap().file_size, Some(3));
        assert!(batch[1].metadata.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trailing_edge_debounce() {
        let stats = Arc::new(RwLock::new(ProjectStats::from_file_count(10)));
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let task = tokio::spawn(debounce(raw_rx, out_tx, stats));

        raw_tx.send(ev("/x/a", EventFlags::MODIFIED, 1)).unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        raw_tx.send(ev("/x/a", EventFlags::MODIFIED, 2)).unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        raw_tx.send(ev("/x/a", EventFlags::MODIFIED, 3)).unwrap();

        // 60ms after the first event, still inside the re-armed window.
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(out_rx.try_recv().is_err());

        let batch = out_rx.recv().await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, 3);

        drop(raw_tx);
        task.await.unwrap();
    }
}
