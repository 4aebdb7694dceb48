//! Project enumeration with exclusion pruning.

use super::language::is_known_file;
use crate::exclusion::ExclusionSet;
use crate::IndexerError;
use ignore::{DirEntry, WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use tracing::debug;

/// Walks a project root, skipping hidden entries and excluded directories.
///
/// VCS ignore files are deliberately not honoured; only the configured
/// exclusion rules decide what is pruned.
pub struct Walker {
    root: PathBuf,
    exclusions: Arc<ExclusionSet>,
}

impl Walker {
    /// Create a new walker for the given root directory.
    pub fn new(root: &Path, exclusions: ExclusionSet) -> Self {
        Self {
            root: root.to_path_buf(),
            exclusions: Arc::new(exclusions),
        }
    }

    fn builder(&self) -> WalkBuilder {
        let root = self.root.clone();
        let exclusions = Arc::clone(&self.exclusions);

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .hidden(true)
            .follow_links(false)
            .filter_entry(move |entry| !is_excluded_dir(&root, &exclusions, entry));
        builder
    }

    /// Walk the tree and return every file on the known-extension
    /// allowlist, sorted by path.
    pub fn walk(&self) -> Result<Vec<PathBuf>, IndexerError> {
        if !self.root.is_dir() {
            return Err(IndexerError::NotFound(self.root.clone()));
        }

        let (tx, rx) = mpsc::channel();

        self.builder().build_parallel().run(|| {
            let tx = tx.clone();
            Box::new(move |result| {
                match result {
                    Ok(entry) => {
                        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
                        if is_file && is_known_file(entry.path()) {
                            let _ = tx.send(entry.into_path());
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "Walk error");
                    }
                }
                WalkState::Continue
            })
        });

        drop(tx);

        let mut files: Vec<PathBuf> = rx.into_iter().collect();
        files.sort();
        Ok(files)
    }

    /// Count regular files, stopping once `limit` is reached.
    pub fn count_files(&self, limit: usize) -> usize {
        let mut count = 0;

        for entry in self.builder().build().flatten() {
            if entry.file_type().is_some_and(|ft| ft.is_file()) {
                count += 1;
                if count >= limit {
                    break;
                }
            }
        }

        count
    }
}

fn is_excluded_dir(root: &Path, exclusions: &ExclusionSet, entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
        return false;
    }

    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    let name = entry.file_name().to_string_lossy();
    exclusions.excludes_dir(&name, relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionRule;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn test_walker_empty_directory() {
        let temp_dir = tempdir().unwrap();
        let walker = Walker::new(temp_dir.path(), ExclusionSet::default());

        assert!(walker.walk().unwrap().is_empty());
    }

    #[test]
    fn test_walker_missing_root() {
        let walker = Walker::new(Path::new("/definitely/not/here"), ExclusionSet::default());
        assert!(matches!(walker.walk(), Err(IndexerError::NotFound(_))));
    }

    #[test]
    fn test_walker_prunes_and_filters() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::create_dir_all(root.join("app/build")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();

        File::create(root.join("src/main.rs")).unwrap();
        File::create(root.join("src/notes.txt")).unwrap();
        File::create(root.join("node_modules/pkg/index.js")).unwrap();
        File::create(root.join("build/out.c")).unwrap();
        File::create(root.join("app/build/gen.c")).unwrap();
        File::create(root.join(".hidden/secret.rs")).unwrap();
        File::create(root.join(".gitignore")).unwrap();

        let walker = Walker::new(
            root,
            ExclusionSet::new(&[
                ExclusionRule::Name("node_modules".into()),
                ExclusionRule::Path("build".into()),
            ]),
        );

        let files: Vec<_> = walker
            .walk()
            .unwrap()
            .into_iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            files,
            vec![PathBuf::from("app/build/gen.c"), PathBuf::from("src/main.rs")]
        );
    }

    #[test]
    fn test_count_files_stops_at_limit() {
        let temp_dir = tempdir().unwrap();
        for i in 0..10 {
            File::create(temp_dir.path().join(format!("f{i}.txt"))).unwrap();
        }

        let walker = Walker::new(temp_dir.path(), ExclusionSet::default());
        assert_eq!(walker.count_files(100), 10);
        assert_eq!(walker.count_files(4), 4);
    }
}
