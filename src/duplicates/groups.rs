//! Digest aggregation and duplicate groups.
//!
//! # Overview
//!
//! [`DigestTable`] is the single piece of shared mutable state in a scan:
//! every hashing worker appends its [`FileRecord`] under the record's
//! digest while holding the table's lock for exactly one insert.
//!
//! Once all workers have joined, [`DigestTable::into_table`] consumes the
//! aggregator and hands back the frozen [`AggregationTable`]. Because the
//! workers borrow the `DigestTable`, the borrow checker guarantees nothing
//! can still be writing at that point.
//!
//! # Example
//!
//! ```
//! use dupescan::duplicates::DigestTable;
//! use dupescan::scanner::{Digest, FileRecord};
//! use std::path::PathBuf;
//!
//! let table = DigestTable::new();
//! let digest = Digest::from_bytes(b"same");
//! table.insert(FileRecord::new(PathBuf::from("/a.txt"), digest.clone()));
//! table.insert(FileRecord::new(PathBuf::from("/b.txt"), digest));
//! table.insert(FileRecord::new(PathBuf::from("/c.txt"), Digest::from_bytes(b"other")));
//!
//! let groups = table.into_table().into_duplicate_groups(true);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].len(), 2);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::scanner::{Digest, FileRecord};

/// Concurrency-safe digest-to-records mapping filled in by workers.
#[derive(Debug, Default)]
pub struct DigestTable {
    inner: Mutex<HashMap<Digest, Vec<FileRecord>>>,
}

impl DigestTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to the group for its digest, creating the group if
    /// absent.
    ///
    /// Safe to call from any number of threads at once; no insert is lost
    /// regardless of interleaving.
    pub fn insert(&self, record: FileRecord) {
        // A panic elsewhere cannot leave the map half-updated, so a
        // poisoned lock is still usable.
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(record.digest.clone()).or_default().push(record);
    }

    /// Freeze the table once every writer has finished.
    #[must_use]
    pub fn into_table(self) -> AggregationTable {
        let groups = self
            .inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        AggregationTable { groups }
    }
}

/// Final, read-only result of a scan: every hashed file grouped by digest.
///
/// Singleton groups are kept here; they are dropped when converting to
/// [`DuplicateGroup`]s.
#[derive(Debug, Clone, Default)]
pub struct AggregationTable {
    groups: HashMap<Digest, Vec<FileRecord>>,
}

impl AggregationTable {
    /// Number of distinct digests.
    #[must_use]
    pub fn digest_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of records across all groups.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Records for one digest, if any.
    #[must_use]
    pub fn get(&self, digest: &Digest) -> Option<&[FileRecord]> {
        self.groups.get(digest).map(Vec::as_slice)
    }

    /// Iterate over every (digest, records) pair, singletons included.
    pub fn iter(&self) -> impl Iterator<Item = (&Digest, &[FileRecord])> {
        self.groups.iter().map(|(d, r)| (d, r.as_slice()))
    }

    /// Keep only groups with two or more members.
    ///
    /// With `sorted`, paths inside each group are sorted and groups are
    /// ordered by their first path; otherwise order is whatever the hash
    /// map and the worker interleaving produced.
    #[must_use]
    pub fn into_duplicate_groups(self, sorted: bool) -> Vec<DuplicateGroup> {
        let mut groups: Vec<DuplicateGroup> = self
            .groups
            .into_iter()
            .filter(|(_, records)| records.len() > 1)
            .map(|(digest, records)| {
                let files = records.into_iter().map(|r| r.path).collect();
                DuplicateGroup::new(digest, files)
            })
            .collect();

        if sorted {
            for group in &mut groups {
                group.files.sort();
            }
            groups.sort_by(|a, b| a.files.first().cmp(&b.files.first()));
        }

        groups
    }
}

/// A set of two or more files sharing one content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Digest shared by every file in the group
    pub digest: Digest,
    /// Member paths
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new group.
    #[must_use]
    pub fn new(digest: Digest, files: Vec<PathBuf>) -> Self {
        Self { digest, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of redundant copies (all members minus one).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }
}
