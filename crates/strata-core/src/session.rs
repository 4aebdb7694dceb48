//! One open project: live tree, watcher and on-demand graph.

use crate::{CoreError, WorkspaceConfig};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use strata_indexer::{
    FileEvent, FileWatcher, GraphStore, IndexerError, NodeChangeEvent, ProjectGraph,
    ProjectStats, Scanner, TreeModel,
};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// An open project.
///
/// The tree is kept current by the watcher for as long as the session is
/// open. The graph is only rebuilt when [`rescan`](Self::rescan) is called.
pub struct WorkspaceSession {
    root: PathBuf,
    config: WorkspaceConfig,
    tree: Arc<TreeModel>,
    scanner: Scanner,
    store: GraphStore,
    watcher: Mutex<Option<FileWatcher>>,
    pump: Mutex<Option<JoinHandle<()>>>,
    graph: RwLock<Option<Arc<ProjectGraph>>>,
    last_error: RwLock<Option<String>>,
    parsing: AtomicBool,
    closed: AtomicBool,
}

impl WorkspaceSession {
    /// Open a project directory.
    ///
    /// Fails only when the path is not an existing directory. A watcher that
    /// cannot start is logged and the session continues without live updates.
    pub async fn open(path: &Path, config: WorkspaceConfig) -> Result<Self, CoreError> {
        let root = path
            .canonicalize()
            .map_err(|_| CoreError::InvalidPath(path.display().to_string()))?;
        if !root.is_dir() {
            return Err(CoreError::InvalidPath(root.display().to_string()));
        }

        let start = Instant::now();
        let tree = Arc::new(
            TreeModel::new(vec![root.clone()])
                .with_exclusions(&config.exclusions)
                .with_event_capacity(config.event_buffer),
        );

        let populating = Arc::clone(&tree);
        tokio::task::spawn_blocking(move || populating.populate())
            .await
            .map_err(IndexerError::from)?;

        let (mut watcher, batches) = FileWatcher::new(vec![root.clone()], config.watcher_options());
        if !watcher.start() {
            warn!(path = ?root, "Live updates unavailable for this project");
        }
        let pump = tokio::spawn(pump_batches(batches, Arc::clone(&tree)));

        info!(
            path = ?root,
            nodes = tree.len(),
            live = watcher.is_live(),
            duration_ms = start.elapsed().as_millis(),
            "Project opened"
        );

        Ok(Self {
            scanner: Scanner::with_options(config.scan_options()),
            store: config.graph_store(),
            root,
            config,
            tree,
            watcher: Mutex::new(Some(watcher)),
            pump: Mutex::new(Some(pump)),
            graph: RwLock::new(None),
            last_error: RwLock::new(None),
            parsing: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        })
    }

    /// Canonical project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// The live tree.
    pub fn tree(&self) -> &Arc<TreeModel> {
        &self.tree
    }

    /// Subscribe to tree changes.
    pub fn subscribe(&self) -> broadcast::Receiver<NodeChangeEvent> {
        self.tree.subscribe()
    }

    /// Whether the watcher is delivering live updates.
    pub fn is_live(&self) -> bool {
        self.watcher.lock().as_ref().is_some_and(|w| w.is_live())
    }

    /// Size classification of the watched project, once available.
    pub fn project_stats(&self) -> Option<ProjectStats> {
        self.watcher.lock().as_ref().map(|w| w.stats())
    }

    /// Parse the whole project into a fresh graph.
    ///
    /// The new graph replaces the previous snapshot and is written to the
    /// graph cache; a cache write failure is logged and does not fail the
    /// rescan.
    pub async fn rescan(&self) -> Result<Arc<ProjectGraph>, CoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CoreError::NoSession);
        }

        self.parsing.store(true, Ordering::SeqCst);
        let result = self.scanner.scan(&self.root, &self.config.exclusions).await;
        self.parsing.store(false, Ordering::SeqCst);

        let graph = match result {
            Ok(graph) => graph,
            Err(e) => {
                error!(path = ?self.root, error = %e, "Rescan failed");
                *self.last_error.write() = Some(e.to_string());
                return Err(e.into());
            }
        };

        if let Err(e) = self.store.save(&self.root, &graph).await {
            warn!(path = ?self.root, error = %e, "Failed to cache project graph");
        }

        let graph = Arc::new(graph);
        *self.graph.write() = Some(Arc::clone(&graph));
        *self.last_error.write() = None;
        Ok(graph)
    }

    /// The graph produced by the most recent successful rescan.
    pub fn graph(&self) -> Option<Arc<ProjectGraph>> {
        self.graph.read().clone()
    }

    pub fn is_parsing(&self) -> bool {
        self.parsing.load(Ordering::SeqCst)
    }

    /// Message of the last failed rescan, cleared by a successful one.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Graph saved by an earlier session, if the cache has one.
    pub async fn cached_graph(&self) -> Option<ProjectGraph> {
        if !self.store.exists(&self.root) {
            return None;
        }
        match self.store.load(&self.root).await {
            Ok(graph) => Some(graph),
            Err(e) => {
                warn!(path = ?self.root, error = %e, "Failed to read cached graph");
                None
            }
        }
    }

    /// Stop live updates. Calling it again does nothing.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(mut watcher) = self.watcher.lock().take() {
            watcher.stop();
        }
        if let Some(pump) = self.pump.lock().take() {
            pump.abort();
        }
        info!(path = ?self.root, "Project closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for WorkspaceSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Feed watcher batches into the tree until the watcher goes away.
async fn pump_batches(mut batches: mpsc::Receiver<Vec<FileEvent>>, tree: Arc<TreeModel>) {
    while let Some(batch) = batches.recv().await {
        let tree = Arc::clone(&tree);
        let events = batch.len();
        if let Err(e) = tokio::task::spawn_blocking(move || tree.apply_events(&batch)).await {
            warn!(error = %e, "Failed to apply change batch");
            continue;
        }
        debug!(events, "Applied change batch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn test_config(cache: &Path) -> WorkspaceConfig {
        WorkspaceConfig {
            cache_dir: cache.to_path_buf(),
            ..WorkspaceConfig::default()
        }
    }

    #[tokio::test]
    async fn test_open_rejects_missing_path() {
        let dir = tempdir().unwrap();
        let result =
            WorkspaceSession::open(&dir.path().join("missing"), test_config(dir.path())).await;
        assert!(matches!(result, Err(CoreError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_open_rejects_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let result = WorkspaceSession::open(&file, test_config(dir.path())).await;
        assert!(matches!(result, Err(CoreError::InvalidPath(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_open_populates_tree() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project");
        fs::create_dir_all(project.join("src")).unwrap();
        fs::create_dir_all(project.join("node_modules/dep")).unwrap();
        fs::write(project.join("src/main.rs"), "fn main() {}").unwrap();

        let session = WorkspaceSession::open(&project, test_config(&dir.path().join("cache")))
            .await
            .unwrap();

        let root = session.root().to_path_buf();
        assert!(session.tree().node_by_path(&root.join("src/main.rs")).is_some());
        assert!(session.tree().node_by_path(&root.join("node_modules")).is_none());
        assert!(session.graph().is_none());
        assert!(!session.is_parsing());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_rescan_stores_and_caches_graph() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("a.swift"), "func foo() {}\n").unwrap();

        let session = WorkspaceSession::open(&project, test_config(&dir.path().join("cache")))
            .await
            .unwrap();
        assert!(session.cached_graph().await.is_none());

        let graph = session.rescan().await.unwrap();
        let file = graph.file("a.swift").unwrap();
        assert!(file.declared_symbols.contains(&"func foo".to_string()));

        assert_eq!(session.graph().map(|g| g.id), Some(graph.id));
        assert_eq!(session.cached_graph().await.map(|g| g.id), Some(graph.id));
        assert!(session.last_error().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_close_is_idempotent() {
        let dir = tempdir().unwrap();
        let session = WorkspaceSession::open(dir.path(), test_config(&dir.path().join("cache")))
            .await
            .unwrap();

        session.close();
        session.close();
        assert!(session.is_closed());
        assert!(!session.is_live());
        assert!(matches!(session.rescan().await, Err(CoreError::NoSession)));
    }
}
