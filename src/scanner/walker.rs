//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and yielding every regular file beneath it. The walk is lazy and
//! single-pass: callers are expected to act on each path (for example,
//! dispatch it to a hashing worker) before pulling the next one.
//!
//! # Error handling
//!
//! - If the root cannot be accessed, a single [`ScanError::RootAccess`] is
//!   yielded and the walk ends.
//! - If an entry below the root cannot be read, a [`ScanError::Traversal`]
//!   is yielded, that subtree is skipped, and the walk continues with the
//!   next sibling.
//!
//! Symbolic links are never followed or yielded, and special files
//! (sockets, FIFOs, devices) are skipped.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("error: {}", e),
//!     }
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use walkdir::{DirEntry, WalkDir};

use super::{ScanError, WalkerConfig};

/// Directory walker for regular-file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupescan::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walk ends at the next entry.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root of the walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Build gitignore matcher from config patterns and, when enabled,
    /// the root `.gitignore`.
    fn build_gitignore(&self) -> Option<Gitignore> {
        let mut builder = GitignoreBuilder::new(&self.root);

        let gitignore_path = self.root.join(".gitignore");
        if self.config.respect_gitignore && gitignore_path.is_file() {
            if let Some(e) = builder.add(&gitignore_path) {
                log::warn!(
                    "Failed to load .gitignore from {}: {}",
                    gitignore_path.display(),
                    e
                );
            } else {
                log::debug!("Loaded .gitignore from {}", gitignore_path.display());
            }
        }

        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if gitignore.is_empty() => None,
            Ok(gitignore) => Some(gitignore),
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Decide whether an entry (and, for directories, its subtree) is kept.
    fn keep_entry(&self, entry: &DirEntry, gitignore: Option<&Gitignore>) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        if self.config.skip_hidden && is_hidden(entry) {
            log::trace!("Skipping hidden entry: {}", entry.path().display());
            return false;
        }

        if let Some(gi) = gitignore {
            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            if gi.matched(relative, entry.file_type().is_dir()).is_ignore() {
                log::trace!("Ignoring: {}", entry.path().display());
                return false;
            }
        }

        true
    }

    /// Walk the directory tree, yielding the path of every regular file.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration, except for a root failure, after which nothing else
    /// is yielded.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupescan::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let gitignore = self.build_gitignore();

        let mut entries = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |entry| self.keep_entry(entry, gitignore.as_ref()));
        let mut root_failed = false;

        std::iter::from_fn(move || loop {
            if root_failed {
                return None;
            }
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return None;
            }

            match entries.next()? {
                Ok(entry) => {
                    let file_type = entry.file_type();

                    if file_type.is_file() {
                        return Some(Ok(entry.into_path()));
                    }
                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                    } else if !file_type.is_dir() {
                        log::trace!("Skipping special file: {}", entry.path().display());
                    }
                }
                Err(e) => {
                    let error = self.convert_error(e);
                    if error.is_fatal() {
                        root_failed = true;
                    }
                    return Some(Err(error));
                }
            }
        })
    }

    /// Convert a walkdir error, classifying root failures as fatal.
    fn convert_error(&self, error: walkdir::Error) -> ScanError {
        let depth = error.depth();
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let source = error
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("filesystem loop detected"));

        if depth == 0 {
            log::error!("Cannot access scan root {}: {}", path.display(), source);
            ScanError::RootAccess { path, source }
        } else {
            log::debug!("Skipping unreadable entry {}: {}", path.display(), source);
            ScanError::Traversal { path, source }
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
