//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Concurrent dispatch of one hashing unit per discovered file
//! - Thread-safe aggregation of file records by digest
//! - Duplicate group extraction

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary, DEFAULT_IO_THREADS};
pub use groups::{AggregationTable, DigestTable, DuplicateGroup};
