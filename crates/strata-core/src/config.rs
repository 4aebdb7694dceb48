//! Configuration for a Strata workspace.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strata_indexer::{ExclusionRule, GraphStore, ScanOptions, WatcherOptions};

/// Workspace configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory subtrees to skip, written as `- name: x` or `- path: a/b`
    #[serde(
        default = "default_exclusions",
        with = "serde_yaml::with::singleton_map_recursive"
    )]
    pub exclusions: Vec<ExclusionRule>,

    /// Files per scanner batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum scanner batches in flight
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Files larger than this many bytes are not parsed (default: 10MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Directory for cached project graphs
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Tree change events buffered per subscriber
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_exclusions() -> Vec<ExclusionRule> {
    ExclusionRule::defaults()
}

fn default_batch_size() -> usize {
    50
}

fn default_max_concurrency() -> usize {
    ScanOptions::default().max_concurrency
}

fn default_max_file_size() -> u64 {
    10_000_000
}

fn default_cache_dir() -> PathBuf {
    GraphStore::default_dir()
}

fn default_event_buffer() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `~/.strata`
fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".strata")
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            exclusions: default_exclusions(),
            batch_size: default_batch_size(),
            max_concurrency: default_max_concurrency(),
            max_file_size: default_max_file_size(),
            cache_dir: default_cache_dir(),
            event_buffer: default_event_buffer(),
            log_level: default_log_level(),
        }
    }
}

impl WorkspaceConfig {
    /// Load `~/.strata/config.yaml`, falling back to defaults
    pub fn load() -> Self {
        let config_path = default_config_dir().join("config.yaml");

        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = ?config_path, error = %e, "Failed to load config file");
                }
            }
        }

        Self::default()
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Scanner settings derived from this config.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            batch_size: self.batch_size.max(1),
            max_concurrency: self.max_concurrency.max(1),
            max_file_size: self.max_file_size,
            ..ScanOptions::default()
        }
    }

    /// Watcher settings derived from this config.
    pub fn watcher_options(&self) -> WatcherOptions {
        WatcherOptions {
            exclusions: self.exclusions.clone(),
            ..WatcherOptions::default()
        }
    }

    pub fn graph_store(&self) -> GraphStore {
        GraphStore::new(self.cache_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = WorkspaceConfig::default();
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.max_file_size, 10_000_000);
        assert_eq!(config.event_buffer, 1024);
        assert_eq!(config.log_level, "info");
        assert!(config
            .exclusions
            .contains(&ExclusionRule::Name("node_modules".to_string())));
        assert!(config.max_concurrency >= 1);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "batch_size: 10\nexclusions:\n  - name: target\n  - path: vendor/cache\n",
        )
        .unwrap();

        let config = WorkspaceConfig::load_from(&path).unwrap();
        assert_eq!(config.batch_size, 10);
        assert_eq!(
            config.exclusions,
            vec![
                ExclusionRule::Name("target".to_string()),
                ExclusionRule::Path("vendor/cache".to_string()),
            ]
        );
        assert_eq!(config.max_file_size, 10_000_000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_from_errors() {
        let dir = tempdir().unwrap();
        let missing = WorkspaceConfig::load_from(&dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(CoreError::Io(_))));

        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "batch_size: [not a number").unwrap();
        assert!(matches!(
            WorkspaceConfig::load_from(&path),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_derived_options() {
        let config = WorkspaceConfig {
            batch_size: 0,
            max_file_size: 42,
            cache_dir: PathBuf::from("/tmp/strata-graphs"),
            ..WorkspaceConfig::default()
        };

        let scan = config.scan_options();
        assert_eq!(scan.batch_size, 1);
        assert_eq!(scan.max_file_size, 42);

        assert_eq!(config.watcher_options().exclusions, config.exclusions);
        assert_eq!(
            config.graph_store().base_dir(),
            Path::new("/tmp/strata-graphs")
        );
    }
}
