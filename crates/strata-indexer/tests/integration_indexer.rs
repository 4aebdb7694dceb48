//! Integration tests for the Strata indexer: scan pipeline, graph storage,
//! size classification and the watcher-to-tree path.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

use strata_indexer::watcher::{classify_project, probe_metadata, ChangeBatcher};
use strata_indexer::{
    EventFlags, ExclusionRule, ExclusionSet, FileEvent, GraphStore, Language, NodeChangeEvent,
    ProjectSize, ScanOptions, Scanner, TreeModel,
};

/// Helper to create a test project structure
fn create_test_project(base: &Path) -> PathBuf {
    let project = base.join("test_project");
    fs::create_dir_all(project.join("src")).unwrap();
    fs::create_dir_all(project.join("node_modules/left-pad")).unwrap();
    fs::create_dir_all(project.join("build/out")).unwrap();

    fs::write(
        project.join("Cargo.toml"),
        r#"[package]
name = "test"
version = "0.1.0"
"#,
    )
    .unwrap();

    fs::write(
        project.join("src/main.rs"),
        r#"mod lib;

fn main() {
    println!("Hello, world!");
}
"#,
    )
    .unwrap();

    fs::write(
        project.join("src/lib.rs"),
        r#"pub fn add(a: i32, b: i32) -> i32 {
    a + b
}
"#,
    )
    .unwrap();

    fs::write(
        project.join("node_modules/left-pad/index.js"),
        "module.exports = function () {};\n",
    )
    .unwrap();
    fs::write(project.join("build/out/bundle.js"), "var x = 1;\n").unwrap();

    project.canonicalize().unwrap()
}

fn hashes(graph: &strata_indexer::ProjectGraph) -> HashMap<String, String> {
    graph
        .files
        .iter()
        .map(|f| (f.path.clone(), f.content_hash.clone()))
        .collect()
}

/// Test full scan pipeline end-to-end
#[tokio::test]
async fn test_scan_pipeline_end_to_end() {
    let temp_dir = tempdir().unwrap();
    let project = create_test_project(temp_dir.path());

    let scanner = Scanner::new();
    let graph = scanner
        .scan(&project, &ExclusionRule::defaults())
        .await
        .unwrap();

    assert!(!graph.is_empty(), "Should have scanned files");

    let main = graph.file("src/main.rs").expect("main.rs should be parsed");
    assert_eq!(main.language, Language::Rust);
    assert!(main.declared_symbols.contains(&"fn main".to_string()));
    assert_eq!(main.content_hash.len(), 64);

    assert!(graph.file("Cargo.toml").is_some());
}

/// Excluded directories never reach the graph
#[tokio::test]
async fn test_scan_respects_exclusions() {
    let temp_dir = tempdir().unwrap();
    let project = create_test_project(temp_dir.path());

    let graph = Scanner::new()
        .scan(&project, &ExclusionRule::defaults())
        .await
        .unwrap();

    for file in &graph.files {
        assert!(
            !file.path.starts_with("node_modules/"),
            "excluded path leaked: {}",
            file.path
        );
        assert!(
            !file.path.starts_with("build/"),
            "excluded path leaked: {}",
            file.path
        );
    }

    let unfiltered = Scanner::new().scan(&project, &[]).await.unwrap();
    assert!(unfiltered
        .file("node_modules/left-pad/index.js")
        .is_some());
}

/// Scanning an unchanged tree twice yields the same content
#[tokio::test]
async fn test_rescan_is_idempotent() {
    let temp_dir = tempdir().unwrap();
    let project = create_test_project(temp_dir.path());

    let scanner = Scanner::with_options(ScanOptions {
        batch_size: 1,
        ..ScanOptions::default()
    });

    let first = scanner.scan(&project, &[]).await.unwrap();
    let second = scanner.scan(&project, &[]).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(hashes(&first), hashes(&second));
}

/// Test graph persistence through the store
#[tokio::test]
async fn test_graph_store_roundtrip() {
    let temp_dir = tempdir().unwrap();
    let project = create_test_project(temp_dir.path());
    let store = GraphStore::new(temp_dir.path().join("graphs"));

    let graph = Scanner::new()
        .scan(&project, &ExclusionRule::defaults())
        .await
        .unwrap();

    assert!(!store.exists(&project));
    store.save(&project, &graph).await.unwrap();
    assert!(store.exists(&project));

    let loaded = store.load(&project).await.unwrap();
    assert_eq!(loaded, graph);

    store.delete(&project).await.unwrap();
    assert!(!store.exists(&project));
    assert!(store.load(&project).await.is_err());
}

fn create_files(root: &Path, count: usize) {
    for i in 0..count {
        let dir = root.join(format!("d{}", i / 1000));
        if i % 1000 == 0 {
            fs::create_dir_all(&dir).unwrap();
        }
        fs::write(dir.join(format!("f{i}.txt")), "").unwrap();
    }
}

#[test]
fn test_classify_medium_project() {
    let temp_dir = tempdir().unwrap();
    create_files(temp_dir.path(), 6_000);

    let stats = classify_project(
        &[temp_dir.path().to_path_buf()],
        &ExclusionSet::default(),
        60_000,
    );

    assert_eq!(stats.file_count, 6_000);
    assert_eq!(stats.size, ProjectSize::Medium);
    assert_eq!(stats.batch_interval, Duration::from_millis(100));
}

#[test]
fn test_classify_large_project_stops_at_cap() {
    let temp_dir = tempdir().unwrap();
    create_files(temp_dir.path(), 60_005);

    let stats = classify_project(
        &[temp_dir.path().to_path_buf()],
        &ExclusionSet::default(),
        60_000,
    );

    assert_eq!(stats.file_count, 60_000);
    assert_eq!(stats.size, ProjectSize::Large);
    assert_eq!(stats.batch_interval, Duration::from_millis(250));
}

/// Three writes to one file coalesce into one batch entry and one tree event
#[test]
fn test_coalesced_writes_update_tree_once() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().canonicalize().unwrap();
    let file = root.join("notes.md");
    fs::write(&file, "a").unwrap();

    let tree = TreeModel::new(vec![root.clone()]);
    tree.populate();
    let mut rx = tree.subscribe();

    let mut batcher = ChangeBatcher::new();
    for (id, body) in ["ab", "abc", "abcd"].iter().enumerate() {
        fs::write(&file, body).unwrap();
        batcher.add(FileEvent::new(&file, EventFlags::MODIFIED, id as u64 + 1));
    }

    let batch = probe_metadata(batcher.take());
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].id, 3);

    tree.apply_events(&batch);

    let mut updates = Vec::new();
    while let Ok(event) = rx.try_recv() {
        updates.push(event);
    }
    assert_eq!(updates.len(), 1);
    match &updates[0] {
        NodeChangeEvent::MetadataUpdated { metadata, .. } => {
            assert_eq!(metadata.file_size, Some(4));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(batcher.is_empty());
}
