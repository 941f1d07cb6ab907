//! Command-line interface definitions for dupescan.
//!
//! This module defines all CLI arguments using the clap derive API.
//! Options left unset fall back to the config file and environment
//! (see [`crate::config`]).
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory
//! dupescan
//!
//! # Scan a directory with a stable, sorted report
//! dupescan ~/Downloads --sort
//!
//! # Eight hashing threads, SHA-256, ignore build output
//! dupescan ~/src --io-threads 8 --algorithm sha256 -i target/
//!
//! # Verbose mode for debugging
//! dupescan -v ~/Downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::scanner::HashAlgorithm;

/// Find duplicate files by content digest.
///
/// dupescan walks a directory tree, hashes every regular file concurrently,
/// and prints each group of files with identical content. Diagnostics go to
/// stderr so the report on stdout can be piped.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except the report and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Do not show the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Number of threads hashing files concurrently
    ///
    /// Lower values reduce disk thrashing on HDDs. [default: 4]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub io_threads: Option<u16>,

    /// Digest algorithm used to compare file contents [default: blake3]
    #[arg(long, value_enum, value_name = "ALGORITHM")]
    pub algorithm: Option<HashAlgorithm>,

    /// Sort groups and their members by path for a stable report
    #[arg(long)]
    pub sort: bool,

    /// Exit with code 3 if any file or directory could not be read
    #[arg(long)]
    pub strict: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Glob patterns to ignore (can be specified multiple times)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Also skip files matched by the root's .gitignore
    #[arg(long)]
    pub gitignore: bool,

    /// Path to a TOML config file
    #[arg(long, value_name = "FILE", env = "DUPESCAN_CONFIG")]
    pub config: Option<PathBuf>,
}
