//! Live project tree.
//!
//! [`TreeModel`] is the single authoritative copy of the project's
//! directory structure. Nodes live in an arena keyed by id; each node
//! stores its parent's id and an ordered list of child ids. A path index
//! gives O(1) lookup by absolute path.
//!
//! Mutations (watcher batches, sorting) take the write lock for their whole
//! duration, so readers always see either the state before a batch or the
//! state after it. Every mutation publishes a [`NodeChangeEvent`] on a
//! broadcast channel while the lock is held, which keeps the event order
//! identical to the mutation order.

mod event;
mod node;

pub use event::NodeChangeEvent;
pub use node::{
    ItemKind, Node, NodeId, NodeMetadata, NodeSnapshot, SortDescriptor, SortDirection,
};

use crate::exclusion::{is_hidden, ExclusionRule, ExclusionSet};
use crate::watcher::FileEvent;
use ignore::WalkBuilder;
use node::display_name;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

const DEFAULT_EVENT_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
struct TreeState {
    nodes: HashMap<NodeId, Node>,
    by_path: HashMap<PathBuf, NodeId>,
    roots: Vec<NodeId>,
}

/// A path found on disk, ready to become a node.
#[derive(Debug, Clone)]
struct DiskEntry {
    path: PathBuf,
    is_dir: bool,
    metadata: NodeMetadata,
}

impl DiskEntry {
    fn probe(path: PathBuf, metadata: Option<NodeMetadata>) -> Self {
        let is_dir = std::fs::metadata(&path).is_ok_and(|m| m.is_dir());
        let metadata = metadata.unwrap_or_else(|| NodeMetadata::probe(&path));
        Self {
            path,
            is_dir,
            metadata,
        }
    }

    fn kind(&self) -> ItemKind {
        if self.is_dir {
            ItemKind::folder()
        } else {
            ItemKind::file()
        }
    }
}

/// Events of one batch, sorted into what happened on disk.
#[derive(Debug, Default)]
struct Classified {
    appeared: Vec<DiskEntry>,
    disappeared: Vec<PathBuf>,
    modified: Vec<(PathBuf, Option<NodeMetadata>)>,
}

/// The authoritative in-memory project tree.
pub struct TreeModel {
    state: RwLock<TreeState>,
    events: broadcast::Sender<NodeChangeEvent>,
    root_paths: Vec<PathBuf>,
    exclusions: Arc<ExclusionSet>,
}

impl TreeModel {
    /// Create a tree with one root node per path. Roots are not populated;
    /// call [`populate`](Self::populate) to read their contents.
    pub fn new(root_paths: Vec<PathBuf>) -> Self {
        let root_paths: Vec<PathBuf> = root_paths.iter().map(|p| normalize(p)).collect();
        let (events, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);

        let mut state = TreeState::default();
        for path in &root_paths {
            if state.by_path.contains_key(path) {
                continue;
            }
            let entry = DiskEntry::probe(path.clone(), None);
            let node = Node::new(entry.path.clone(), entry.kind(), entry.metadata, None);
            state.by_path.insert(node.path.clone(), node.id);
            state.roots.push(node.id);
            state.nodes.insert(node.id, node);
        }

        Self {
            state: RwLock::new(state),
            events,
            root_paths,
            exclusions: Arc::new(ExclusionSet::default()),
        }
    }

    /// Apply exclusion rules to disk population.
    pub fn with_exclusions(mut self, rules: &[ExclusionRule]) -> Self {
        self.exclusions = Arc::new(ExclusionSet::new(rules));
        self
    }

    /// Set the broadcast buffer size. Slow subscribers that fall further
    /// behind than this see a lag error.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        self.events = events;
        self
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<NodeChangeEvent> {
        self.events.subscribe()
    }

    /// Root paths the tree was created with.
    pub fn root_paths(&self) -> &[PathBuf] {
        &self.root_paths
    }

    /// Read every root's contents from disk, replacing existing children.
    ///
    /// Emits a single `Reloaded { parent_id: None }`.
    pub fn populate(&self) {
        let mut subtrees = Vec::new();
        for root in &self.root_paths {
            subtrees.push(read_subtree(root, &self.root_paths, &self.exclusions));
        }

        let mut state = self.state.write();
        let mut count = 0;

        for (root, entries) in self.root_paths.iter().zip(subtrees) {
            let Some(&root_id) = state.by_path.get(root) else {
                continue;
            };

            let children = state
                .nodes
                .get(&root_id)
                .map(|n| n.children.clone())
                .unwrap_or_default();
            for child in children {
                unmap_subtree(&mut state, child);
            }
            if let Some(root_node) = state.nodes.get_mut(&root_id) {
                root_node.children.clear();
            }

            count += insert_entries(&mut state, entries);
        }

        info!(nodes = count, roots = self.root_paths.len(), "Tree populated");
        self.emit(NodeChangeEvent::Reloaded { parent_id: None });
    }

    /// Look up a node by id.
    pub fn node_by_id(&self, id: NodeId) -> Option<Node> {
        self.state.read().nodes.get(&id).cloned()
    }

    /// Look up a node by absolute path. A trailing separator is ignored.
    pub fn node_by_path(&self, path: &Path) -> Option<Node> {
        let state = self.state.read();
        let id = state.by_path.get(&normalize(path))?;
        state.nodes.get(id).cloned()
    }

    /// Root nodes, in creation order.
    pub fn root_nodes(&self) -> Vec<Node> {
        let state = self.state.read();
        state
            .roots
            .iter()
            .filter_map(|id| state.nodes.get(id).cloned())
            .collect()
    }

    /// Children of a node, in display order.
    pub fn children_of(&self, id: NodeId) -> Vec<Node> {
        let state = self.state.read();
        state
            .nodes
            .get(&id)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|c| state.nodes.get(c).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Recursive copy of a subtree.
    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let state = self.state.read();
        snapshot_of(&state, id)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.state.read().nodes.len()
    }

    /// Check if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.state.read().nodes.is_empty()
    }

    /// Set a folder's expansion flag. Returns false for unknown ids.
    pub fn set_expanded(&self, id: NodeId, expanded: bool) -> bool {
        let mut state = self.state.write();
        match state.nodes.get_mut(&id) {
            Some(node) => {
                node.is_expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Apply one watcher batch.
    ///
    /// Renamed or created-and-removed paths are resolved against the disk.
    /// Within the batch, a path that disappeared and a new path in the same
    /// folder become a rename, and a path that disappeared and a new path
    /// with the same name in another folder become a move. Everything else
    /// is handled as independent deletions, creations and modifications,
    /// in that order.
    pub fn apply_events(&self, batch: &[FileEvent]) {
        if batch.is_empty() {
            return;
        }

        let classified = classify(batch, &self.root_paths);
        let mut created_folders = Vec::new();

        {
            let mut state = self.state.write();
            let mut appeared = classified.appeared;
            let mut modified = classified.modified;

            let (renames, moves, deletions) =
                pair_paths(&state, &classified.disappeared, &appeared);

            let mut consumed = HashSet::new();
            for (old, index) in renames {
                consumed.insert(index);
                self.rename_node(&mut state, &old, &appeared[index]);
            }
            for (old, index) in moves {
                consumed.insert(index);
                self.move_node(&mut state, &old, &appeared[index]);
            }

            let mut deletions = deletions;
            deletions.sort_by_key(|p| p.components().count());
            for path in deletions {
                self.remove_path(&mut state, &path);
            }

            let mut creations: Vec<DiskEntry> = appeared
                .drain(..)
                .enumerate()
                .filter(|(i, _)| !consumed.contains(i))
                .map(|(_, entry)| entry)
                .collect();
            creations.sort_by_key(|e| e.path.components().count());

            for entry in creations {
                if state.by_path.contains_key(&entry.path) {
                    modified.push((entry.path, Some(entry.metadata)));
                    continue;
                }
                if let Some(id) = self.create_node(&mut state, entry.clone()) {
                    if entry.is_dir {
                        created_folders.push((id, entry.path));
                    }
                }
            }

            for (path, metadata) in modified {
                self.update_metadata(&mut state, &path, metadata);
            }
        }

        for (id, path) in created_folders {
            self.populate_folder(id, &path);
        }
    }

    /// Sort a folder's children. Returns false when `id` is not a folder.
    pub fn sort_children(
        &self,
        id: NodeId,
        descriptor: SortDescriptor,
        direction: SortDirection,
    ) -> bool {
        let mut state = self.state.write();

        let Some(node) = state.nodes.get(&id) else {
            return false;
        };
        if !node.is_folder() {
            return false;
        }

        let mut children: Vec<(NodeId, &Node)> = node
            .children
            .iter()
            .filter_map(|c| state.nodes.get(c).map(|n| (*c, n)))
            .collect();

        children.sort_by(|(_, a), (_, b)| {
            let ordering = compare_nodes(a, b, descriptor);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        let sorted: Vec<NodeId> = children.into_iter().map(|(c, _)| c).collect();
        if let Some(node) = state.nodes.get_mut(&id) {
            node.children = sorted;
            node.sort_descriptor = Some(descriptor);
            node.sort_direction = direction;
        }

        self.emit(NodeChangeEvent::Reloaded {
            parent_id: Some(id),
        });
        true
    }

    /// Check the structural invariants, returning a description of every
    /// violation found.
    pub fn validate(&self) -> Vec<String> {
        let state = self.state.read();
        let mut problems = Vec::new();

        for (id, node) in &state.nodes {
            if node.id != *id {
                problems.push(format!("node {id} stored under wrong key"));
            }
            if state.by_path.get(&node.path) != Some(id) {
                problems.push(format!("node {id} missing from path index"));
            }

            match node.parent {
                Some(parent_id) => match state.nodes.get(&parent_id) {
                    Some(parent) => {
                        let listed = parent.children.iter().filter(|c| *c == id).count();
                        if listed != 1 {
                            problems.push(format!(
                                "node {id} listed {listed} times by its parent"
                            ));
                        }
                    }
                    None => problems.push(format!("node {id} has a dangling parent")),
                },
                None => {
                    if !state.roots.contains(id) {
                        problems.push(format!("parentless node {id} is not a root"));
                    }
                }
            }

            for child in &node.children {
                match state.nodes.get(child) {
                    Some(c) if c.parent == Some(*id) => {}
                    Some(_) => problems.push(format!("child {child} of {id} has another parent")),
                    None => problems.push(format!("child {child} of {id} is not mapped")),
                }
            }
        }

        for (path, id) in &state.by_path {
            if state.nodes.get(id).map(|n| &n.path) != Some(path) {
                problems.push(format!("path index entry {} is stale", path.display()));
            }
        }

        problems
    }

    fn emit(&self, event: NodeChangeEvent) {
        trace!(event = ?event, "Tree change");
        let _ = self.events.send(event);
    }

    fn rename_node(&self, state: &mut TreeState, old: &Path, entry: &DiskEntry) {
        let Some(id) = state.by_path.get(old).copied() else {
            return;
        };

        let old_name = match state.nodes.get_mut(&id) {
            Some(node) => {
                let old_name = std::mem::replace(&mut node.name, display_name(&entry.path));
                node.metadata = entry.metadata.clone();
                old_name
            }
            None => return,
        };

        remap_paths(state, id, old, &entry.path);
        debug!(from = ?old, to = ?entry.path, "Renamed node");

        self.emit(NodeChangeEvent::Renamed {
            node_id: id,
            old_name,
            new_name: display_name(&entry.path),
        });
    }

    fn move_node(&self, state: &mut TreeState, old: &Path, entry: &DiskEntry) {
        let Some(id) = state.by_path.get(old).copied() else {
            return;
        };
        let Some(to_parent) = entry.path.parent().and_then(|p| state.by_path.get(p)).copied() else {
            return;
        };
        let from_parent = state.nodes.get(&id).and_then(|n| n.parent);

        let Some(from_index) = detach(state, id, from_parent) else {
            self.emit(NodeChangeEvent::Reloaded {
                parent_id: from_parent,
            });
            return;
        };

        let to_index = match state.nodes.get_mut(&to_parent) {
            Some(parent) => {
                parent.children.push(id);
                parent.children.len() - 1
            }
            None => return,
        };

        if let Some(node) = state.nodes.get_mut(&id) {
            node.parent = Some(to_parent);
            node.metadata = entry.metadata.clone();
        }
        remap_paths(state, id, old, &entry.path);
        debug!(from = ?old, to = ?entry.path, "Moved node");

        self.emit(NodeChangeEvent::Moved {
            node_id: id,
            from_parent_id: from_parent,
            to_parent_id: Some(to_parent),
            from_index,
            to_index,
        });
    }

    fn remove_path(&self, state: &mut TreeState, path: &Path) {
        let Some(id) = state.by_path.get(path).copied() else {
            trace!(path = ?path, "Removal of unmapped path");
            return;
        };
        let parent = state.nodes.get(&id).and_then(|n| n.parent);

        let index = detach(state, id, parent);
        unmap_subtree(state, id);
        debug!(path = ?path, "Removed node");

        match index {
            Some(from_index) => self.emit(NodeChangeEvent::Removed {
                node_id: id,
                parent_id: parent,
                from_index,
            }),
            None => self.emit(NodeChangeEvent::Reloaded { parent_id: parent }),
        }
    }

    fn create_node(&self, state: &mut TreeState, entry: DiskEntry) -> Option<NodeId> {
        let is_root = self.root_paths.contains(&entry.path);

        let parent = if is_root {
            None
        } else {
            match entry.path.parent().and_then(|p| state.by_path.get(p)) {
                Some(&parent) => Some(parent),
                None => {
                    trace!(path = ?entry.path, "Creation outside the tree");
                    return None;
                }
            }
        };

        let node = Node::new(entry.path.clone(), entry.kind(), entry.metadata, parent);
        let id = node.id;

        match parent {
            Some(parent_id) => match state.nodes.get_mut(&parent_id) {
                Some(p) => p.children.push(id),
                None => return None,
            },
            None => state.roots.push(id),
        }

        state.by_path.insert(entry.path, id);
        state.nodes.insert(id, node.clone());
        debug!(path = ?node.path, "Added node");

        self.emit(NodeChangeEvent::Added {
            node,
            parent_id: parent,
        });
        Some(id)
    }

    fn update_metadata(&self, state: &mut TreeState, path: &Path, metadata: Option<NodeMetadata>) {
        let Some(metadata) = metadata else {
            return;
        };
        let Some(id) = state.by_path.get(path).copied() else {
            return;
        };
        let Some(node) = state.nodes.get_mut(&id) else {
            return;
        };

        if node.metadata == metadata {
            return;
        }
        node.metadata = metadata.clone();

        self.emit(NodeChangeEvent::MetadataUpdated {
            node_id: id,
            metadata,
        });
    }

    /// Map the on-disk contents of a folder that was just created.
    fn populate_folder(&self, id: NodeId, path: &Path) {
        let entries = read_subtree(path, &self.root_paths, &self.exclusions);
        if entries.is_empty() {
            return;
        }

        let mut state = self.state.write();
        if !state.nodes.contains_key(&id) {
            return;
        }

        let added = insert_entries(&mut state, entries);
        if added > 0 {
            debug!(path = ?path, nodes = added, "Populated new folder");
            self.emit(NodeChangeEvent::Reloaded {
                parent_id: Some(id),
            });
        }
    }
}

/// Sort a batch into appeared, disappeared and modified paths, probing
/// the disk where the flags alone are ambiguous. Hidden paths are dropped,
/// matching what population maps.
fn classify(batch: &[FileEvent], roots: &[PathBuf]) -> Classified {
    let mut classified = Classified::default();
    let mut seen = HashSet::new();

    for event in batch {
        let path = normalize(&event.path);
        if is_hidden(&path, roots) {
            trace!(path = ?path, "Hidden path in batch");
            continue;
        }
        if !seen.insert(path.clone()) {
            warn!(path = ?path, "Duplicate path in batch");
            continue;
        }

        let ambiguous = event.is_renamed() || (event.is_created() && event.is_removed());
        if ambiguous {
            if std::fs::symlink_metadata(&path).is_ok() {
                classified
                    .appeared
                    .push(DiskEntry::probe(path, event.metadata.clone()));
            } else {
                classified.disappeared.push(path);
            }
        } else if event.is_removed() {
            classified.disappeared.push(path);
        } else if event.is_created() {
            classified
                .appeared
                .push(DiskEntry::probe(path, event.metadata.clone()));
        } else if event.is_modified() {
            let metadata = event
                .metadata
                .clone()
                .or_else(|| NodeMetadata::try_probe(&path));
            classified.modified.push((path, metadata));
        }
    }

    classified
}

type Pairs = (Vec<(PathBuf, usize)>, Vec<(PathBuf, usize)>, Vec<PathBuf>);

/// Pair disappeared paths with appeared ones: same folder means rename,
/// same name under another mapped folder means move. Returns renames,
/// moves and the remaining deletions.
fn pair_paths(state: &TreeState, disappeared: &[PathBuf], appeared: &[DiskEntry]) -> Pairs {
    let mut used = HashSet::new();
    let mut renames = Vec::new();
    let mut unpaired = Vec::new();

    let candidate = |entry: &DiskEntry, used: &HashSet<usize>, i: usize| {
        !used.contains(&i) && !state.by_path.contains_key(&entry.path)
    };

    for old in disappeared {
        if !state.by_path.contains_key(old) {
            unpaired.push(old.clone());
            continue;
        }

        let found = appeared
            .iter()
            .enumerate()
            .find(|(i, e)| candidate(*e, &used, *i) && e.path.parent() == old.parent());

        match found {
            Some((i, _)) => {
                used.insert(i);
                renames.push((old.clone(), i));
            }
            None => unpaired.push(old.clone()),
        }
    }

    let mut moves = Vec::new();
    let mut deletions = Vec::new();

    for old in unpaired {
        if !state.by_path.contains_key(&old) {
            deletions.push(old);
            continue;
        }

        let found = appeared.iter().enumerate().find(|(i, e)| {
            candidate(*e, &used, *i)
                && e.path.file_name() == old.file_name()
                && !e.path.starts_with(&old)
                && e.path.parent().is_some_and(|p| state.by_path.contains_key(p))
        });

        match found {
            Some((i, _)) => {
                used.insert(i);
                moves.push((old, i));
            }
            None => deletions.push(old),
        }
    }

    (renames, moves, deletions)
}

/// Remove `id` from its parent's children (or the root list), returning
/// the index it occupied.
fn detach(state: &mut TreeState, id: NodeId, parent: Option<NodeId>) -> Option<usize> {
    let siblings = match parent {
        Some(parent_id) => &mut state.nodes.get_mut(&parent_id)?.children,
        None => &mut state.roots,
    };
    let index = siblings.iter().position(|c| *c == id)?;
    siblings.remove(index);
    Some(index)
}

/// Drop a node and all of its descendants from both indexes.
fn unmap_subtree(state: &mut TreeState, id: NodeId) {
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        if let Some(node) = state.nodes.remove(&current) {
            if state.by_path.get(&node.path) == Some(&current) {
                state.by_path.remove(&node.path);
            }
            stack.extend(node.children);
        }
    }
}

/// Rewrite the path of `id` and every descendant from `old` to `new`.
fn remap_paths(state: &mut TreeState, id: NodeId, old: &Path, new: &Path) {
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        let Some(node) = state.nodes.get_mut(&current) else {
            continue;
        };

        let suffix = node.path.strip_prefix(old).map(Path::to_path_buf);
        let Ok(suffix) = suffix else {
            continue;
        };
        let updated = if suffix.as_os_str().is_empty() {
            new.to_path_buf()
        } else {
            new.join(suffix)
        };

        let previous = std::mem::replace(&mut node.path, updated.clone());
        stack.extend(node.children.iter().copied());

        if state.by_path.get(&previous) == Some(&current) {
            state.by_path.remove(&previous);
        }
        state.by_path.insert(updated, current);
    }
}

/// Insert disk entries (parents before children) whose parent is mapped.
fn insert_entries(state: &mut TreeState, entries: Vec<DiskEntry>) -> usize {
    let mut count = 0;

    for entry in entries {
        if state.by_path.contains_key(&entry.path) {
            continue;
        }
        let Some(parent_id) = entry.path.parent().and_then(|p| state.by_path.get(p)).copied()
        else {
            continue;
        };

        let node = Node::new(entry.path.clone(), entry.kind(), entry.metadata, Some(parent_id));
        let id = node.id;

        if let Some(parent) = state.nodes.get_mut(&parent_id) {
            parent.children.push(id);
            state.by_path.insert(entry.path, id);
            state.nodes.insert(id, node);
            count += 1;
        }
    }

    count
}

/// Read everything below `dir` in file-name order, parents first, skipping
/// hidden and excluded entries.
fn read_subtree(dir: &Path, roots: &[PathBuf], exclusions: &Arc<ExclusionSet>) -> Vec<DiskEntry> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let filter_exclusions = Arc::clone(exclusions);
    let filter_roots = roots.to_vec();

    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .hidden(true)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            entry.depth() == 0
                || !filter_exclusions.excludes_path(entry.path(), filter_roots.as_slice())
        })
        .build();

    let mut entries = Vec::new();
    for result in walker {
        match result {
            Ok(entry) if entry.depth() > 0 => {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                let path = entry.into_path();
                let metadata = NodeMetadata::probe(&path);
                entries.push(DiskEntry {
                    path,
                    is_dir,
                    metadata,
                });
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Walk error"),
        }
    }

    entries
}

fn snapshot_of(state: &TreeState, id: NodeId) -> Option<NodeSnapshot> {
    let node = state.nodes.get(&id)?;
    Some(NodeSnapshot {
        id,
        path: node.path.clone(),
        name: node.name.clone(),
        kind: node.kind.clone(),
        metadata: node.metadata.clone(),
        is_expanded: node.is_expanded,
        children: node
            .children
            .iter()
            .filter_map(|c| snapshot_of(state, *c))
            .collect(),
    })
}

fn compare_nodes(a: &Node, b: &Node, descriptor: SortDescriptor) -> Ordering {
    match descriptor {
        SortDescriptor::Name => natural_cmp(&a.name, &b.name),
        SortDescriptor::DateModified => a.metadata.modified_date.cmp(&b.metadata.modified_date),
        SortDescriptor::Size => a
            .metadata
            .file_size
            .unwrap_or(0)
            .cmp(&b.metadata.file_size.unwrap_or(0)),
        SortDescriptor::Type => natural_cmp(
            a.metadata.file_type.as_deref().unwrap_or(""),
            b.metadata.file_type.as_deref().unwrap_or(""),
        ),
    }
}

/// Case-insensitive comparison that orders digit runs numerically, so
/// `file2` sorts before `file10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_number(&mut a);
                let right = take_number(&mut b);
                let ordering = left
                    .trim_start_matches('0')
                    .len()
                    .cmp(&right.trim_start_matches('0').len())
                    .then_with(|| {
                        left.trim_start_matches('0')
                            .cmp(right.trim_start_matches('0'))
                    });
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                let ordering = x.to_lowercase().cmp(y.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}

/// Canonical key form of a path: no trailing separator, no `.` segments.
fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}
