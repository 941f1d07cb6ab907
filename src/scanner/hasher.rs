//! Streaming file hasher.
//!
//! # Overview
//!
//! [`Hasher`] computes a fixed-width content digest of a file by reading it
//! in [`READ_BUFFER_SIZE`] chunks, so memory use does not depend on file
//! size. Two files with identical bytes always produce identical digests.
//! This is a content-equality check: collision resistance beyond accidental
//! duplicates is not relied upon.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::with_algorithm(HashAlgorithm::Sha256);
//! let digest = hasher.hash(Path::new("Cargo.toml")).unwrap();
//! assert_eq!(digest.as_str().len(), 64);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use super::HashError;

/// Size of the read buffer used when streaming file contents (64 KiB).
pub const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Digest algorithm applied to file contents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// BLAKE3, 256-bit
    #[default]
    Blake3,
    /// SHA-256, 256-bit
    Sha256,
}

impl HashAlgorithm {
    /// Length of the rendered hex digest.
    #[must_use]
    pub fn hex_len(self) -> usize {
        match self {
            Self::Blake3 | Self::Sha256 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blake3 => f.write_str("blake3"),
            Self::Sha256 => f.write_str("sha256"),
        }
    }
}

/// Lowercase hexadecimal content digest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(String);

impl Digest {
    /// Render raw digest bytes as lowercase hex.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        use std::fmt::Write as _;

        let mut hex = String::with_capacity(bytes.len() * 2);
        for byte in bytes {
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    /// The hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Running digest state for one file.
enum DigestState {
    Blake3(Box<blake3::Hasher>),
    Sha256(sha2::Sha256),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
            HashAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Blake3(h) => {
                h.update(chunk);
            }
            Self::Sha256(h) => h.update(chunk),
        }
    }

    fn finish(self) -> Digest {
        match self {
            Self::Blake3(h) => Digest::from_bytes(h.finalize().as_bytes()),
            Self::Sha256(h) => Digest::from_bytes(&h.finalize()),
        }
    }
}

/// Streaming content hasher.
///
/// The hasher is stateless apart from its configuration and can be shared
/// between worker threads behind an [`Arc`].
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Hasher {
    /// Create a BLAKE3 hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hasher for the given algorithm.
    #[must_use]
    pub fn with_algorithm(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag. Hashing stops between chunks once it is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash the full contents of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened, if any read
    /// fails part-way through, or if shutdown is requested.
    pub fn hash(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(path, file)
    }

    /// Hash everything `reader` yields. `path` is only used for errors.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] on read failure or shutdown.
    pub fn hash_reader<R: Read>(&self, path: &Path, mut reader: R) -> Result<Digest, HashError> {
        let mut state = DigestState::new(self.algorithm);
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }

            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            state.update(&buffer[..n]);
        }

        Ok(state.finish())
    }
}
