//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Recursive directory walking that keeps going past unreadable subtrees
//! - Streaming content digests (BLAKE3 or SHA-256)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and regular-file discovery
//! - [`hasher`]: Streaming file hashing
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Hasher, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => match hasher.hash(&path) {
//!             Ok(digest) => println!("{digest}  {}", path.display()),
//!             Err(e) => eprintln!("error: {e}"),
//!         },
//!         Err(e) => eprintln!("error: {e}"),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{Digest, HashAlgorithm, Hasher, READ_BUFFER_SIZE};
pub use walker::Walker;

/// A file whose content has been hashed successfully.
///
/// Records are created by a completed hashing unit of work and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path of the file as discovered by the walker
    pub path: PathBuf,
    /// Content digest of the file
    pub digest: Digest,
}

impl FileRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(path: PathBuf, digest: Digest) -> Self {
        Self { path, digest }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Skip hidden files and directories (names starting with `.`).
    /// The root itself is never skipped.
    pub skip_hidden: bool,

    /// Glob patterns to ignore (gitignore-style), relative to the root.
    pub ignore_patterns: Vec<String>,

    /// Also apply the root's `.gitignore`. Off by default, so every
    /// regular file under the root is scanned unless excluded explicitly.
    pub respect_gitignore: bool,
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(skip_hidden: bool, ignore_patterns: Vec<String>) -> Self {
        Self {
            skip_hidden,
            ignore_patterns,
            respect_gitignore: false,
        }
    }

    /// Enable or disable the root's `.gitignore`.
    #[must_use]
    pub fn with_respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }
}

/// Errors that can occur during a scan.
///
/// Only [`ScanError::RootAccess`] is fatal; the others are recorded and
/// the scan carries on.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The scan root could not be opened or listed.
    #[error("cannot access scan root {path}: {source}")]
    RootAccess {
        /// The root that was requested
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An entry below the root could not be read; its subtree was skipped.
    #[error("{path}: {source}")]
    Traversal {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A discovered file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::RootAccess { path, .. } | Self::Traversal { path, .. } => path,
            Self::Hash(e) => e.path(),
        }
    }

    /// Whether this error aborts the whole scan.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RootAccess { .. })
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file vanished between discovery and hashing.
    #[error("{0}: file not found")]
    NotFound(PathBuf),

    /// Permission was denied when opening or reading the file.
    #[error("{0}: permission denied")]
    PermissionDenied(PathBuf),

    /// Any other I/O error, including failures part-way through a read.
    #[error("{path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Hashing stopped because shutdown was requested.
    #[error("{0}: interrupted")]
    Interrupted(PathBuf),
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path) | Self::PermissionDenied(path) | Self::Interrupted(path) => path,
            Self::Io { path, .. } => path,
        }
    }
}
