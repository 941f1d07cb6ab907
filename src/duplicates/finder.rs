//! Scan orchestration: traversal, concurrent hashing and aggregation.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives the whole pipeline:
//!
//! 1. **Walk** - the [`Walker`] yields regular file paths one at a time.
//! 2. **Dispatch** - every path is spawned as its own unit of work on a
//!    fixed-size rayon pool, before the walker is asked for the next one.
//! 3. **Hash and aggregate** - each unit hashes its file and appends a
//!    [`FileRecord`] to the shared [`DigestTable`], or records a
//!    [`HashError`] and inserts nothing.
//! 4. **Join** - the rayon scope does not return until every spawned unit
//!    has finished, after which the table is frozen into an
//!    [`AggregationTable`].
//!
//! Only a root failure aborts the scan. Unreadable subtrees and files are
//! collected in [`ScanSummary::errors`] and the scan carries on.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(8));
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! for group in &groups {
//!     println!("{}: {} files", group.digest, group.len());
//! }
//! println!("{} files failed", summary.failed_files);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::progress::ProgressCallback;
use crate::scanner::{
    FileRecord, HashAlgorithm, HashError, Hasher, ScanError, Walker, WalkerConfig,
};

use super::groups::{AggregationTable, DigestTable, DuplicateGroup};

/// Default number of hashing workers.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of worker threads hashing files concurrently (at least 1).
    pub io_threads: usize,
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
    /// Walker configuration
    pub walker_config: WalkerConfig,
    /// Sort groups, group members and errors by path
    pub sort: bool,
    /// Optional shutdown flag for graceful termination
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("algorithm", &self.algorithm)
            .field("walker_config", &self.walker_config)
            .field("sort", &self.sort)
            .field("shutdown_flag", &self.shutdown_flag.is_some())
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            algorithm: HashAlgorithm::default(),
            walker_config: WalkerConfig::default(),
            sort: false,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of hashing threads (clamped to at least 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Enable or disable deterministic ordering of results.
    #[must_use]
    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Set the shutdown flag.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics of a finished scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files handed to the worker pool
    pub total_files: usize,
    /// Files hashed successfully (present in exactly one digest group)
    pub hashed_files: usize,
    /// Files that could not be hashed
    pub failed_files: usize,
    /// Subtrees skipped because they could not be read
    pub skipped_entries: usize,
    /// Number of duplicate groups (two or more members)
    pub duplicate_groups: usize,
    /// Redundant copies across all groups (members beyond the first)
    pub duplicate_files: usize,
    /// Wall-clock duration of the scan
    pub scan_duration: Duration,
    /// Recovered errors, one per failed file or skipped subtree
    pub errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Whether any file or subtree could not be processed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn record_groups(&mut self, groups: &[DuplicateGroup]) {
        self.duplicate_groups = groups.len();
        self.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root exists but cannot be opened or listed.
    #[error("Cannot access scan root {path}: {source}")]
    RootAccess {
        /// The requested root
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The hashing worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Shared state borrowed by every unit of work.
struct WorkerContext<'a> {
    hasher: &'a Hasher,
    table: &'a DigestTable,
    errors: &'a Mutex<Vec<ScanError>>,
    config: &'a FinderConfig,
}

impl WorkerContext<'_> {
    /// One unit of work: hash `path` and record the outcome.
    fn process_file(&self, path: PathBuf) {
        if self.config.is_shutdown_requested() {
            log::trace!("Shutdown requested, not hashing {}", path.display());
            self.finish(&path, false);
            return;
        }

        match self.hasher.hash(&path) {
            Ok(digest) => {
                log::trace!("{}  {}", digest, path.display());
                self.finish(&path, true);
                self.table.insert(FileRecord::new(path, digest));
            }
            Err(e) => {
                log::debug!("Failed to hash {}: {}", path.display(), e);
                self.finish(&path, false);
                self.report(e);
            }
        }
    }

    fn report(&self, error: HashError) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ScanError::Hash(error));
    }

    fn finish(&self, path: &Path, ok: bool) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_file_done(path.to_string_lossy().as_ref(), ok);
        }
    }
}

/// Duplicate finder that runs the scan-and-group pipeline.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::with_algorithm(config.algorithm);
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(Arc::clone(flag));
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Scan `root` and return duplicate groups with summary statistics.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the root is missing, not a directory,
    /// or unreadable, if the worker pool cannot start, or if the scan is
    /// interrupted.
    pub fn find_duplicates(
        &self,
        root: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let (table, summary) = self.scan(root)?;
        Ok(self.finish_groups(table, summary))
    }

    /// Hash an explicit list of files, without walking, and group them.
    ///
    /// Missing or unreadable files are reported in the summary like any
    /// other hashing failure.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the worker pool cannot start or the scan
    /// is interrupted.
    pub fn find_duplicates_in_files(
        &self,
        files: Vec<PathBuf>,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let (table, summary) = self.dispatch(files.into_iter().map(Ok))?;
        Ok(self.finish_groups(table, summary))
    }

    /// Scan `root` and return the full aggregation table, singletons
    /// included.
    ///
    /// # Errors
    ///
    /// See [`DuplicateFinder::find_duplicates`].
    pub fn scan(&self, root: &Path) -> Result<(AggregationTable, ScanSummary), FinderError> {
        validate_root(root)?;

        log::info!("Scanning {}", root.display());
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_scan_start(root.to_string_lossy().as_ref());
        }

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        self.dispatch(walker.walk())
    }

    fn finish_groups(
        &self,
        table: AggregationTable,
        mut summary: ScanSummary,
    ) -> (Vec<DuplicateGroup>, ScanSummary) {
        let groups = table.into_duplicate_groups(self.config.sort);
        summary.record_groups(&groups);

        log::info!(
            "Found {} duplicate groups ({} redundant files) among {} files in {:.2?}",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.total_files,
            summary.scan_duration
        );

        (groups, summary)
    }

    /// Spawn one unit of work per path and wait for all of them.
    fn dispatch<I>(&self, entries: I) -> Result<(AggregationTable, ScanSummary), FinderError>
    where
        I: Iterator<Item = Result<PathBuf, ScanError>>,
    {
        let start = Instant::now();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads.max(1))
            .thread_name(|i| format!("dupescan-hash-{}", i))
            .build()?;

        let table = DigestTable::new();
        let errors = Mutex::new(Vec::new());
        let context = WorkerContext {
            hasher: &self.hasher,
            table: &table,
            errors: &errors,
            config: &self.config,
        };

        let mut total_files = 0usize;
        let mut fatal: Option<FinderError> = None;

        // Every unit spawned in the scope is joined before it returns
        pool.in_place_scope(|scope| {
            let context = &context;
            for entry in entries {
                match entry {
                    Ok(path) => {
                        total_files += 1;
                        if let Some(ref callback) = self.config.progress_callback {
                            callback.on_file_discovered(path.to_string_lossy().as_ref());
                        }
                        scope.spawn(move |_| context.process_file(path));
                    }
                    Err(ScanError::RootAccess { path, source }) => {
                        fatal = Some(FinderError::RootAccess { path, source });
                        break;
                    }
                    Err(e) => {
                        errors.lock().unwrap_or_else(PoisonError::into_inner).push(e);
                    }
                }
            }
        });

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_scan_end();
        }

        if let Some(error) = fatal {
            return Err(error);
        }
        if self.config.is_shutdown_requested() {
            log::info!("Scan interrupted after {} files", total_files);
            return Err(FinderError::Interrupted);
        }

        let table = table.into_table();
        let mut errors = errors.into_inner().unwrap_or_else(PoisonError::into_inner);
        if self.config.sort {
            errors.sort_by(|a, b| a.path().cmp(b.path()));
        }

        let failed_files = errors
            .iter()
            .filter(|e| matches!(e, ScanError::Hash(_)))
            .count();
        let summary = ScanSummary {
            total_files,
            hashed_files: table.record_count(),
            failed_files,
            skipped_entries: errors.len() - failed_files,
            scan_duration: start.elapsed(),
            errors,
            ..Default::default()
        };

        log::debug!(
            "Hashed {} of {} files ({} failed, {} subtrees skipped)",
            summary.hashed_files,
            summary.total_files,
            summary.failed_files,
            summary.skipped_entries
        );

        Ok((table, summary))
    }
}

/// Check that `root` exists and is a directory before any work starts.
fn validate_root(root: &Path) -> Result<(), FinderError> {
    match fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(FinderError::NotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(FinderError::PathNotFound(root.to_path_buf()))
        }
        Err(source) => Err(FinderError::RootAccess {
            path: root.to_path_buf(),
            source,
        }),
    }
}
