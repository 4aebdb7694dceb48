//! Node types for the live project tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Unique identifier for a tree node.
pub type NodeId = Uuid;

/// Whether a node is a folder or a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Folder { custom_icon: Option<String> },
    File { custom_icon: Option<String> },
}

impl ItemKind {
    pub fn folder() -> Self {
        ItemKind::Folder { custom_icon: None }
    }

    pub fn file() -> Self {
        ItemKind::File { custom_icon: None }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, ItemKind::Folder { .. })
    }

    /// Icon to display, falling back to the kind's default.
    pub fn icon_name(&self) -> &str {
        match self {
            ItemKind::Folder { custom_icon } => custom_icon.as_deref().unwrap_or("folder"),
            ItemKind::File { custom_icon } => custom_icon.as_deref().unwrap_or("doc.text"),
        }
    }
}

/// Filesystem facts about a node. `None` means not probed yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    pub file_size: Option<u64>,
    pub creation_date: Option<DateTime<Utc>>,
    pub modified_date: Option<DateTime<Utc>>,
    pub file_type: Option<String>,
    pub is_read_only: bool,
    pub tags: Vec<String>,
}

impl NodeMetadata {
    /// Probe a path, returning `None` if it cannot be stat'ed.
    pub fn try_probe(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        let is_dir = meta.is_dir();

        let file_type = if is_dir {
            Some("folder".to_string())
        } else {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
        };

        Some(Self {
            file_size: (!is_dir).then(|| meta.len()),
            creation_date: meta.created().ok().map(DateTime::<Utc>::from),
            modified_date: meta.modified().ok().map(DateTime::<Utc>::from),
            file_type,
            is_read_only: meta.permissions().readonly(),
            tags: Vec::new(),
        })
    }

    /// Best-effort probe: failures yield empty metadata.
    pub fn probe(path: &Path) -> Self {
        Self::try_probe(path).unwrap_or_default()
    }
}

/// Sort key for a folder's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDescriptor {
    Name,
    DateModified,
    Size,
    Type,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A node in the arena. Children and parent are ids into the owning
/// [`TreeModel`](super::TreeModel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub path: PathBuf,
    pub name: String,
    pub kind: ItemKind,
    pub metadata: NodeMetadata,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub is_expanded: bool,
    pub sort_descriptor: Option<SortDescriptor>,
    pub sort_direction: SortDirection,
}

impl Node {
    pub(crate) fn new(
        path: PathBuf,
        kind: ItemKind,
        metadata: NodeMetadata,
        parent: Option<NodeId>,
    ) -> Self {
        let name = display_name(&path);
        Self {
            id: Uuid::new_v4(),
            path,
            name,
            kind,
            metadata,
            children: Vec::new(),
            parent,
            is_expanded: true,
            sort_descriptor: None,
            sort_direction: SortDirection::Ascending,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }
}

/// Serializable, recursive copy of a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub path: PathBuf,
    pub name: String,
    pub kind: ItemKind,
    pub metadata: NodeMetadata,
    pub is_expanded: bool,
    pub children: Vec<NodeSnapshot>,
}

/// Last path component, or the whole path for roots like `/`.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
