//! File system watcher for detecting changes.
//!
//! Native notifications (FSEvents, inotify, ...) are converted to
//! [`FileEvent`]s, filtered by the exclusion rules and handed to a single
//! debounce task. The debounce interval follows the project's size, which
//! is classified by a capped background walk when the watcher starts.

mod batcher;
mod event;
mod size;

pub use batcher::{probe_metadata, ChangeBatcher};
pub use event::{EventFlags, EventIds, FileEvent};
pub use size::{classify_project, ProjectSize, ProjectStats, SIZE_SCAN_CAP};

use crate::exclusion::{is_hidden, ExclusionRule, ExclusionSet};
use crate::IndexerError;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Options for the file watcher.
#[derive(Debug, Clone)]
pub struct WatcherOptions {
    /// Directories to ignore
    pub exclusions: Vec<ExclusionRule>,
    /// Capacity of the batch delivery channel
    pub channel_capacity: usize,
    /// Maximum number of files counted when classifying the project
    pub size_scan_cap: usize,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            exclusions: ExclusionRule::defaults(),
            channel_capacity: 64,
            size_scan_cap: SIZE_SCAN_CAP,
        }
    }
}

/// Watches one or more roots and delivers debounced batches.
pub struct FileWatcher {
    roots: Vec<PathBuf>,
    options: WatcherOptions,
    stats: Arc<RwLock<ProjectStats>>,
    out: Option<mpsc::Sender<Vec<FileEvent>>>,
    native: Option<RecommendedWatcher>,
    debounce_task: Option<JoinHandle<()>>,
}

impl FileWatcher {
    /// Create a watcher and the receiving end of its batch channel.
    ///
    /// Nothing is watched until [`start`](Self::start) is called.
    pub fn new(
        roots: Vec<PathBuf>,
        options: WatcherOptions,
    ) -> (Self, mpsc::Receiver<Vec<FileEvent>>) {
        let (tx, rx) = mpsc::channel(options.channel_capacity.max(1));
        let watcher = Self {
            roots,
            options,
            stats: Arc::new(RwLock::new(ProjectStats::default())),
            out: Some(tx),
            native: None,
            debounce_task: None,
        };
        (watcher, rx)
    }

    /// Subscribe to native notifications and start debouncing.
    ///
    /// Must be called from within a Tokio runtime. Returns `false` when
    /// live updates are unavailable; the failure is logged and the watcher
    /// stays inert.
    pub fn start(&mut self) -> bool {
        if self.native.is_some() {
            return true;
        }

        let Some(out) = self.out.take() else {
            warn!("Watcher already stopped");
            return false;
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = %e, "Watcher needs a Tokio runtime");
                return false;
            }
        };

        let exclusions = Arc::new(ExclusionSet::new(&self.options.exclusions));
        let roots = Arc::new(self.roots.clone());
        let ids = EventIds::default();
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();

        let handler = {
            let exclusions = Arc::clone(&exclusions);
            let roots = Arc::clone(&roots);
            move |result: notify::Result<notify::Event>| match result {
                Ok(event) => {
                    for file_event in event::convert_event(&event, &ids) {
                        if is_hidden(&file_event.path, roots.as_slice())
                            || exclusions.excludes_path(&file_event.path, roots.as_slice())
                        {
                            continue;
                        }
                        if raw_tx.send(file_event).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => warn!(error = %e, "Watcher error"),
            }
        };

        let native = match subscribe(handler, &roots) {
            Ok(native) => native,
            Err(e) => {
                error!(error = %e, "Live updates disabled");
                return false;
            }
        };

        let stats = Arc::clone(&self.stats);
        let cap = self.options.size_scan_cap;
        let scan_roots = Arc::clone(&roots);
        let scan_exclusions = Arc::clone(&exclusions);
        runtime.spawn_blocking(move || {
            let classified = classify_project(&scan_roots, &scan_exclusions, cap);
            *stats.write() = classified;
        });

        self.debounce_task = Some(runtime.spawn(batcher::debounce(
            raw_rx,
            out,
            Arc::clone(&self.stats),
        )));
        self.native = Some(native);
        true
    }

    /// Drop the native subscription and cancel any pending flush.
    ///
    /// Safe to call more than once; the watcher cannot be restarted.
    pub fn stop(&mut self) {
        self.out = None;

        if let Some(native) = self.native.take() {
            drop(native);
            debug!(roots = self.roots.len(), "Native subscription released");
        }
        if let Some(task) = self.debounce_task.take() {
            task.abort();
        }
    }

    /// Whether native notifications are currently flowing.
    pub fn is_live(&self) -> bool {
        self.native.is_some()
    }

    /// Current size classification.
    pub fn stats(&self) -> ProjectStats {
        *self.stats.read()
    }

    /// Roots being watched.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

/// Create the native watcher and watch every root recursively.
///
/// Roots that cannot be watched are logged and skipped; it is an error only
/// when none can.
fn subscribe<F>(handler: F, roots: &[PathBuf]) -> Result<RecommendedWatcher, IndexerError>
where
    F: notify::EventHandler,
{
    let mut native = notify::recommended_watcher(handler)?;

    let mut watched = 0;
    for root in roots {
        match native.watch(Path::new(root), RecursiveMode::Recursive) {
            Ok(()) => {
                watched += 1;
                info!(path = ?root, "Started watching");
            }
            Err(e) => warn!(path = ?root, error = %e, "Failed to watch path"),
        }
    }

    if watched == 0 {
        return Err(IndexerError::Watcher("no watchable roots".to_string()));
    }
    Ok(native)
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
