//! Best-effort on-disk cache for project graphs.
//!
//! Each project gets one pretty-printed JSON file named after the SHA-256
//! of its root path. Writes go through a temporary file and a rename so a
//! reader never sees a half-written graph.

use crate::graph::ProjectGraph;
use crate::IndexerError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stores graph snapshots under a single directory.
#[derive(Debug, Clone)]
pub struct GraphStore {
    base_dir: PathBuf,
}

impl GraphStore {
    /// Create a store rooted at `base_dir`.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Default cache location for graph snapshots.
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("strata")
            .join("project-graphs")
    }

    /// Directory holding the snapshots.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Cache key for a project root.
    pub fn project_key(project_path: &Path) -> String {
        let mut hasher = Sha256::new();
        hasher.update(project_path.to_string_lossy().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Snapshot file for a project root.
    pub fn graph_path(&self, project_path: &Path) -> PathBuf {
        self.base_dir
            .join(format!("{}.json", Self::project_key(project_path)))
    }

    /// Check whether a snapshot exists for a project.
    pub fn exists(&self, project_path: &Path) -> bool {
        self.graph_path(project_path).exists()
    }

    /// Persist a graph, replacing any previous snapshot.
    pub async fn save(
        &self,
        project_path: &Path,
        graph: &ProjectGraph,
    ) -> Result<(), IndexerError> {
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| storage_error(&self.base_dir, e))?;

        let path = self.graph_path(project_path);
        let json = serde_json::to_string_pretty(graph)?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| storage_error(&temp_path, e))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| storage_error(&path, e))?;

        debug!(path = ?path, size = json.len(), "Saved project graph");
        Ok(())
    }

    /// Load the cached graph for a project.
    pub async fn load(&self, project_path: &Path) -> Result<ProjectGraph, IndexerError> {
        let path = self.graph_path(project_path);

        if !path.exists() {
            return Err(IndexerError::NotFound(path));
        }

        let json = tokio::fs::read_to_string(&path).await?;
        let graph: ProjectGraph = serde_json::from_str(&json)?;

        debug!(path = ?path, files = graph.len(), "Loaded project graph");
        Ok(graph)
    }

    /// Remove the cached graph for a project, if any.
    pub async fn delete(&self, project_path: &Path) -> Result<(), IndexerError> {
        let path = self.graph_path(project_path);
        if path.exists() {
            tokio::fs::remove_file(&path).await?;
            info!(path = ?path, "Deleted project graph");
        }
        Ok(())
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> IndexerError {
    IndexerError::Storage(format!("{}: {e}", path.display()))
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FileNode;
    use crate::scanner::Language;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn graph() -> ProjectGraph {
        let mut graph = ProjectGraph::new();
        graph.files.push(FileNode {
            id: Uuid::new_v4(),
            path: "src/App.swift".to_string(),
            language: Language::Swift,
            content_hash: "abc".to_string(),
            declared_symbols: vec!["struct App".to_string()],
            imports: vec!["SwiftUI".to_string()],
            role_hints: vec![],
        });
        graph
    }

    #[test]
    fn test_project_key() {
        let key = GraphStore::project_key(Path::new("/work/app"));
        assert_eq!(key.len(), 64);
        assert_eq!(key, GraphStore::project_key(Path::new("/work/app")));
        assert_ne!(key, GraphStore::project_key(Path::new("/work/other")));
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let store = GraphStore::new(temp_dir.path().join("graphs"));
        let project = Path::new("/work/app");
        let graph = graph();

        assert!(!store.exists(project));
        store.save(project, &graph).await.unwrap();
        assert!(store.exists(project));

        let raw = std::fs::read_to_string(store.graph_path(project)).unwrap();
        assert!(raw.contains("\n  \"files\""));

        let loaded = store.load(project).await.unwrap();
        assert_eq!(loaded, graph);
    }

    #[tokio::test]
    async fn test_load_missing() {
        let temp_dir = tempdir().unwrap();
        let store = GraphStore::new(temp_dir.path().to_path_buf());

        let result = store.load(Path::new("/nowhere")).await;
        assert!(matches!(result, Err(IndexerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_save_into_unusable_dir() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("graphs");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = GraphStore::new(blocker.clone());
        let result = store.save(Path::new("/work/app"), &graph()).await;

        match result {
            Err(IndexerError::Storage(message)) => {
                assert!(message.contains(&blocker.display().to_string()))
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = tempdir().unwrap();
        let store = GraphStore::new(temp_dir.path().to_path_buf());
        let project = Path::new("/work/app");

        store.save(project, &graph()).await.unwrap();
        store.delete(project).await.unwrap();
        assert!(!store.exists(project));
        store.delete(project).await.unwrap();
    }
}
