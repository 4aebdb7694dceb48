//! The host-owned workspace: at most one open project at a time.

use crate::{CoreError, WorkspaceConfig, WorkspaceSession};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// File written into a project directory created through
/// [`Workspace::create_and_open_project`].
pub const PROJECT_MANIFEST: &str = "strata.project";

/// Owns the current [`WorkspaceSession`].
pub struct Workspace {
    config: WorkspaceConfig,
    current: Mutex<Option<Arc<WorkspaceSession>>>,
}

impl Workspace {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            config,
            current: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Open `path`, replacing the current project.
    ///
    /// The previous session is closed only once the new one has opened, so
    /// a bad path leaves the current project untouched.
    pub async fn open_project(&self, path: &Path) -> Result<Arc<WorkspaceSession>, CoreError> {
        let session = Arc::new(WorkspaceSession::open(path, self.config.clone()).await?);

        let previous = self.current.lock().replace(Arc::clone(&session));
        if let Some(previous) = previous {
            previous.close();
        }

        Ok(session)
    }

    /// Create the project directory with an empty manifest, then open it.
    pub async fn create_and_open_project(
        &self,
        path: &Path,
    ) -> Result<Arc<WorkspaceSession>, CoreError> {
        tokio::fs::create_dir_all(path).await?;

        let manifest = path.join(PROJECT_MANIFEST);
        if !manifest.exists() {
            tokio::fs::write(&manifest, b"").await?;
            info!(path = ?manifest, "Project manifest created");
        }

        self.open_project(path).await
    }

    /// Close the current project.
    pub fn close_project(&self) -> Result<(), CoreError> {
        let session = self.current.lock().take().ok_or(CoreError::NoSession)?;
        session.close();
        Ok(())
    }

    /// The open project, if any.
    pub fn current(&self) -> Option<Arc<WorkspaceSession>> {
        self.current.lock().clone()
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceConfig::load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn workspace(cache: &Path) -> Workspace {
        Workspace::new(WorkspaceConfig {
            cache_dir: cache.to_path_buf(),
            ..WorkspaceConfig::default()
        })
    }

    #[test]
    fn test_close_without_project() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());
        assert!(ws.current().is_none());
        assert!(matches!(ws.close_project(), Err(CoreError::NoSession)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failed_open_keeps_current() {
        let dir = tempdir().unwrap();
        let ws = workspace(&dir.path().join("cache"));

        let first = ws.open_project(dir.path()).await.unwrap();
        assert!(ws.open_project(&dir.path().join("missing")).await.is_err());

        let current = ws.current().unwrap();
        assert!(Arc::ptr_eq(&current, &first));
        assert!(!current.is_closed());
    }
}
