//! Strata Indexer
//!
//! This crate provides the live indexing engine for Strata, including:
//! - A filesystem watcher with size-adaptive, trailing-edge debouncing
//! - An authoritative in-memory project tree driven by watcher batches
//! - A bounded-parallel scanner with byte-level, per-language extraction
//! - A project graph of files, imports, symbols and role hints
//! - A best-effort on-disk cache for project graph snapshots

mod error;
pub mod exclusion;
pub mod graph;
pub mod scanner;
pub mod storage;
pub mod tree;
pub mod watcher;

pub use error::IndexerError;
pub use exclusion::{ExclusionRule, ExclusionSet};
pub use graph::{FileNode, GraphBuilder, GraphSink, ProjectGraph};
pub use scanner::{
    profile_for, role_hints, CodeSignature, Language, LanguageProfile, ScanOptions, Scanner,
    SignatureExtractor,
};
pub use storage::GraphStore;
pub use tree::{
    ItemKind, Node, NodeChangeEvent, NodeId, NodeMetadata, NodeSnapshot, SortDescriptor,
    SortDirection, TreeModel,
};
pub use watcher::{
    EventFlags, FileEvent, FileWatcher, ProjectSize, ProjectStats, WatcherOptions,
};
