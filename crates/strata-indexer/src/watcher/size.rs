//! Project size classification for picking the debounce interval.

use crate::exclusion::ExclusionSet;
use crate::scanner::Walker;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Upper bound on files counted during classification.
pub const SIZE_SCAN_CAP: usize = 60_000;

const SMALL_LIMIT: usize = 5_000;
const MEDIUM_LIMIT: usize = 50_000;

/// Coarse project size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSize {
    /// Not classified yet
    Unknown,
    Small,
    Medium,
    Large,
}

impl ProjectSize {
    pub fn from_file_count(count: usize) -> Self {
        if count < SMALL_LIMIT {
            ProjectSize::Small
        } else if count < MEDIUM_LIMIT {
            ProjectSize::Medium
        } else {
            ProjectSize::Large
        }
    }

    /// Debounce interval used for this size.
    pub fn batch_interval(self) -> Duration {
        match self {
            ProjectSize::Small => Duration::from_millis(50),
            ProjectSize::Medium | ProjectSize::Unknown => Duration::from_millis(100),
            ProjectSize::Large => Duration::from_millis(250),
        }
    }
}

/// Classification result exposed by the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectStats {
    pub size: ProjectSize,
    pub file_count: usize,
    pub batch_interval: Duration,
}

impl ProjectStats {
    pub fn from_file_count(file_count: usize) -> Self {
        let size = ProjectSize::from_file_count(file_count);
        Self {
            size,
            file_count,
            batch_interval: size.batch_interval(),
        }
    }
}

impl Default for ProjectStats {
    fn default() -> Self {
        Self {
            size: ProjectSize::Unknown,
            file_count: 0,
            batch_interval: ProjectSize::Unknown.batch_interval(),
        }
    }
}

/// Count eligible files under all roots, stopping at `cap`, and classify.
///
/// Blocking; run it off the async executor.
pub fn classify_project(roots: &[PathBuf], exclusions: &ExclusionSet, cap: usize) -> ProjectStats {
    let mut count = 0;

    for root in roots {
        if count >= cap {
            break;
        }
        let walker = Walker::new(root, exclusions.clone());
        count += walker.count_files(cap - count);
    }

    let stats = ProjectStats::from_file_count(count);
    info!(
        files = count,
        size = ?stats.size,
        interval_ms = stats.batch_interval.as_millis(),
        "Classified project size"
    );
    stats
}
