//! Project graph: one immutable record per parsed file.
//!
//! A graph is rebuilt wholesale on every scan and never patched in place.

mod builder;

pub use builder::{GraphBuilder, GraphSink};

use crate::scanner::Language;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Parsed facts about a single source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub id: Uuid,
    /// Path relative to the project root, `/` separated
    pub path: String,
    pub language: Language,
    /// SHA-256 of the file bytes, hex encoded
    pub content_hash: String,
    pub declared_symbols: Vec<String>,
    pub imports: Vec<String>,
    /// Ranked heuristic roles, most confident first
    pub role_hints: Vec<String>,
}

/// Snapshot of every file parsed in one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGraph {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub files: Vec<FileNode>,
}

impl ProjectGraph {
    /// Create an empty graph stamped with the current time.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            files: Vec::new(),
        }
    }

    /// Find a file by its relative path.
    pub fn file(&self, path: &str) -> Option<&FileNode> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Number of files in the graph.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sort files by path for stable output.
    pub fn sort(&mut self) {
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
    }
}

impl Default for ProjectGraph {
    fn default() -> Self {
        Self::new()
    }
}
