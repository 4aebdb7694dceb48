//! Directory exclusion rules shared by the scanner and the watcher.
//!
//! A rule either names a directory to skip anywhere in the project or
//! points at one directory relative to the project root. Both the
//! enumeration pass and the live event filter go through the same
//! [`ExclusionSet`], so a subtree that is never scanned is never watched.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path};

/// A single exclusion rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExclusionRule {
    /// Exclude any directory with this name, at any depth
    Name(String),
    /// Exclude the directory at this root-relative path
    Path(String),
}

impl ExclusionRule {
    /// Rules applied to a freshly opened workspace.
    pub fn defaults() -> Vec<ExclusionRule> {
        vec![
            ExclusionRule::Name("node_modules".to_string()),
            ExclusionRule::Name(".git".to_string()),
            ExclusionRule::Name(".DS_Store".to_string()),
            ExclusionRule::Path("build".to_string()),
            ExclusionRule::Path("dist".to_string()),
        ]
    }
}

/// Pre-split, lowercased rule sets for O(1) lookups.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    names: HashSet<String>,
    paths: HashSet<String>,
}

impl ExclusionSet {
    /// Build a matcher from a list of rules.
    pub fn new(rules: &[ExclusionRule]) -> Self {
        let mut names = HashSet::new();
        let mut paths = HashSet::new();

        for rule in rules {
            match rule {
                ExclusionRule::Name(name) => {
                    let name = name.trim().to_lowercase();
                    if !name.is_empty() {
                        names.insert(name);
                    }
                }
                ExclusionRule::Path(path) => {
                    let path = path.trim().trim_matches('/').to_lowercase();
                    if !path.is_empty() {
                        paths.insert(path);
                    }
                }
            }
        }

        Self { names, paths }
    }

    /// True when no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.paths.is_empty()
    }

    /// Check a directory during enumeration, given its name and its
    /// path relative to the project root.
    pub fn excludes_dir(&self, name: &str, relative: &Path) -> bool {
        if self.names.contains(&name.to_lowercase()) {
            return true;
        }
        !self.paths.is_empty() && self.paths.contains(&relative_key(relative))
    }

    /// Check a root-relative path: excluded when any of its components is
    /// an excluded name, or any of its ancestors (itself included) is an
    /// excluded path.
    pub fn excludes_relative(&self, relative: &Path) -> bool {
        let mut prefix = String::new();

        for component in relative.components() {
            let Component::Normal(part) = component else {
                continue;
            };
            let part = part.to_string_lossy().to_lowercase();

            if self.names.contains(&part) {
                return true;
            }

            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(&part);

            if self.paths.contains(&prefix) {
                return true;
            }
        }

        false
    }

    /// Check an absolute path against the first root that contains it.
    ///
    /// Paths outside every root are only matched against name rules.
    pub fn excludes_path(&self, path: &Path, roots: &[impl AsRef<Path>]) -> bool {
        if self.is_empty() {
            return false;
        }

        for root in roots {
            if let Ok(relative) = path.strip_prefix(root.as_ref()) {
                return self.excludes_relative(relative);
            }
        }

        path.components().any(|c| match c {
            Component::Normal(part) => self
                .names
                .contains(&part.to_string_lossy().to_lowercase()),
            _ => false,
        })
    }
}

/// Whether `path` lies inside a dot-named entry below the first root that
/// contains it. Enumeration, tree population and live events all skip such
/// paths. Paths outside every root are never hidden.
pub fn is_hidden(path: &Path, roots: &[impl AsRef<Path>]) -> bool {
    roots
        .iter()
        .find_map(|root| path.strip_prefix(root.as_ref()).ok())
        .is_some_and(|relative| {
            relative.components().any(|c| match c {
                Component::Normal(part) => part.to_string_lossy().starts_with('.'),
                _ => false,
            })
        })
}

/// Lowercased, `/`-joined form of a relative path.
fn relative_key(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_lowercase()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
