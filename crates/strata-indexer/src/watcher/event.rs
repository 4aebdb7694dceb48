//! Watcher event type and conversion from native notifications.

use crate::tree::NodeMetadata;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use std::ops::{BitOr, BitOrAssign};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Raw change flags. Several may be set on one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EventFlags(u32);

impl EventFlags {
    pub const NONE: EventFlags = EventFlags(0);
    pub const CREATED: EventFlags = EventFlags(1 << 0);
    pub const REMOVED: EventFlags = EventFlags(1 << 1);
    pub const MODIFIED: EventFlags = EventFlags(1 << 2);
    pub const INODE_META_MOD: EventFlags = EventFlags(1 << 3);
    pub const RENAMED: EventFlags = EventFlags(1 << 4);

    pub fn contains(self, other: EventFlags) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for EventFlags {
    type Output = EventFlags;

    fn bitor(self, rhs: EventFlags) -> EventFlags {
        EventFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventFlags {
    fn bitor_assign(&mut self, rhs: EventFlags) {
        self.0 |= rhs.0;
    }
}

/// A filesystem change for a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub path: PathBuf,
    pub flags: EventFlags,
    /// Monotonic per-watcher sequence number
    pub id: u64,
    /// Filled in at flush time for paths that still exist
    pub metadata: Option<NodeMetadata>,
}

impl FileEvent {
    pub fn new(path: impl Into<PathBuf>, flags: EventFlags, id: u64) -> Self {
        Self {
            path: path.into(),
            flags,
            id,
            metadata: None,
        }
    }

    pub fn is_created(&self) -> bool {
        self.flags.contains(EventFlags::CREATED)
    }

    pub fn is_removed(&self) -> bool {
        self.flags.contains(EventFlags::REMOVED)
    }

    pub fn is_modified(&self) -> bool {
        self.flags.contains(EventFlags::MODIFIED) || self.flags.contains(EventFlags::INODE_META_MOD)
    }

    pub fn is_renamed(&self) -> bool {
        self.flags.contains(EventFlags::RENAMED)
    }

    /// Removed, and nothing else that would bring the path back.
    pub fn is_removal_only(&self) -> bool {
        self.is_removed() && !self.is_created() && !self.is_renamed()
    }
}

/// Source of monotonic event ids.
#[derive(Debug, Default)]
pub struct EventIds(AtomicU64);

impl EventIds {
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Convert a native event into zero or more [`FileEvent`]s.
pub(crate) fn convert_event(event: &Event, ids: &EventIds) -> Vec<FileEvent> {
    let flags = match &event.kind {
        EventKind::Create(_) => EventFlags::CREATED,
        EventKind::Remove(_) => EventFlags::REMOVED,
        EventKind::Modify(ModifyKind::Name(_)) => EventFlags::RENAMED,
        EventKind::Modify(ModifyKind::Metadata(_)) => EventFlags::INODE_META_MOD,
        EventKind::Modify(_) => EventFlags::MODIFIED,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => return Vec::new(),
    };

    // A paired rename reports [from, to]; each side is its own event.
    let paths: &[PathBuf] = match &event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => &event.paths,
        _ => event.paths.get(..1).unwrap_or(&[]),
    };

    paths
        .iter()
        .map(|path| {
            trace!(path = ?path, flags = flags.bits(), "Native event");
            FileEvent::new(path.clone(), flags, ids.next())
        })
        .collect()
}
