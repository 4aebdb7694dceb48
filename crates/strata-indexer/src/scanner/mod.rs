//! Concurrent project scanner.
//!
//! Enumerates a project, splits the eligible files into fixed-size
//! batches and processes them on a bounded pool of blocking workers.
//! Each file is hashed and run through its language profile; the results
//! are streamed to a [`GraphBuilder`].

mod bytes;
mod language;
mod profile;
mod roles;
mod signature;
mod walker;

pub use language::{detect_language, is_known_file, Language, LanguageCache, KNOWN_EXTENSIONS};
pub use profile::{profile_for, LanguagePattern, LanguageProfile};
pub use roles::role_hints;
pub use signature::{CodeSignature, Parameter, SignatureExtractor};
pub use walker::Walker;

use crate::exclusion::{ExclusionRule, ExclusionSet};
use crate::graph::{FileNode, GraphBuilder, GraphSink, ProjectGraph};
use crate::IndexerError;
use memmap2::Mmap;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Options for scanning a project.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Files per worker batch
    pub batch_size: usize,
    /// Maximum number of batches processed at once
    pub max_concurrency: usize,
    /// Files larger than this are skipped
    pub max_file_size: u64,
    /// Files larger than this are streamed instead of memory-mapped
    pub stream_threshold: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            batch_size: 50,
            max_concurrency: num_cpus(),
            max_file_size: 10_000_000,
            stream_threshold: 1_000_000,
        }
    }
}

/// The main scanner that orchestrates enumeration and parsing.
pub struct Scanner {
    options: ScanOptions,
    languages: Arc<LanguageCache>,
}

impl Scanner {
    /// Create a new scanner with default options.
    pub fn new() -> Self {
        Self::with_options(ScanOptions::default())
    }

    /// Create a scanner with custom options.
    pub fn with_options(options: ScanOptions) -> Self {
        Self {
            options,
            languages: Arc::new(LanguageCache::default()),
        }
    }

    /// Scan options in effect.
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan a project and build its graph.
    ///
    /// Per-file failures are logged and the file is left out; only a
    /// missing root or a failed enumeration is an error.
    pub async fn scan(
        &self,
        root: &Path,
        rules: &[ExclusionRule],
    ) -> Result<ProjectGraph, IndexerError> {
        let start = Instant::now();

        let root = root
            .canonicalize()
            .map_err(|_| IndexerError::NotFound(root.to_path_buf()))?;

        info!(path = ?root, "Starting scan");

        let walker = Walker::new(&root, ExclusionSet::new(rules));
        let files = tokio::task::spawn_blocking(move || walker.walk()).await??;

        debug!(count = files.len(), "Files discovered");

        let (sink, builder) = GraphBuilder::channel();
        let collector = tokio::spawn(builder.build());

        let permits = Arc::new(Semaphore::new(self.options.max_concurrency.max(1)));
        let mut batches = JoinSet::new();
        let root = Arc::new(root);

        for batch in files.chunks(self.options.batch_size.max(1)) {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| IndexerError::Task(e.to_string()))?;

            let batch = batch.to_vec();
            let root = Arc::clone(&root);
            let languages = Arc::clone(&self.languages);
            let options = self.options.clone();
            let sink = sink.clone();

            batches.spawn_blocking(move || {
                let _permit = permit;
                process_batch(&root, &batch, &languages, &options, &sink)
            });
        }
        drop(sink);

        let mut skipped = 0;
        while let Some(result) = batches.join_next().await {
            match result {
                Ok(count) => skipped += count,
                Err(e) => warn!(error = %e, "Scan batch failed"),
            }
        }

        let graph = collector.await?;

        info!(
            files = graph.len(),
            skipped = skipped,
            duration_ms = start.elapsed().as_millis(),
            "Scan complete"
        );

        Ok(graph)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Process one batch, returning the number of files that failed.
fn process_batch(
    root: &Path,
    batch: &[PathBuf],
    languages: &LanguageCache,
    options: &ScanOptions,
    sink: &GraphSink,
) -> usize {
    let mut failed = 0;

    for path in batch {
        match process_file(root, path, languages, options) {
            Ok(Some(node)) => {
                if !sink.push(node) {
                    warn!(path = ?path, "Graph builder closed early");
                    return failed;
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(path = ?path, error = %e, "Skipping file");
                failed += 1;
            }
        }
    }

    failed
}

/// Hash and parse a single file.
pub fn process_file(
    root: &Path,
    path: &Path,
    languages: &LanguageCache,
    options: &ScanOptions,
) -> Result<Option<FileNode>, IndexerError> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Ok(None);
    }

    let language = languages.language_for(path);
    if language == Language::Unknown {
        return Ok(None);
    }

    let size = metadata.len();
    if size > options.max_file_size {
        return Err(IndexerError::FileTooLarge {
            path: path.to_path_buf(),
            size,
        });
    }

    let profile = profile_for(language);
    let parsed = if size > options.stream_threshold {
        parse_streamed(path, profile)?
    } else {
        parse_mapped(path, profile)?
    };

    let relative = relative_path(root, path);
    let role_hints = role_hints(&relative);

    Ok(Some(FileNode {
        id: Uuid::new_v4(),
        path: relative,
        language,
        content_hash: parsed.hash,
        declared_symbols: parsed.symbols,
        imports: parsed.imports,
        role_hints,
    }))
}

struct Parsed {
    hash: String,
    imports: Vec<String>,
    symbols: Vec<String>,
}

fn parse_mapped(path: &Path, profile: &LanguageProfile) -> Result<Parsed, IndexerError> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(parse_bytes(&[], profile));
    }

    // SAFETY: the map is read-only and dropped before returning. A
    // concurrent truncation by another process can fault, which is the
    // accepted cost of mapping instead of copying.
    let map = unsafe { Mmap::map(&file)? };
    Ok(parse_bytes(&map, profile))
}

fn parse_bytes(data: &[u8], profile: &LanguageProfile) -> Parsed {
    Parsed {
        hash: compute_hash(data),
        imports: profile.extract_imports(data),
        symbols: profile.extract_symbols(data),
    }
}

fn parse_streamed(path: &Path, profile: &LanguageProfile) -> Result<Parsed, IndexerError> {
    let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
    let mut hasher = Sha256::new();
    let mut imports = Vec::new();
    let mut symbols = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        hasher.update(&line);
        imports.extend(profile.extract_imports(&line));
        symbols.extend(profile.extract_symbols(&line));
    }

    Ok(Parsed {
        hash: format!("{:x}", hasher.finalize()),
        imports,
        symbols,
    })
}

/// Compute SHA256 hash of content.
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Root-relative, `/`-separated form of a path.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
        .trim_start_matches('/')
        .to_string()
}

/// Get the number of CPUs available.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
