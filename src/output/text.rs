//! Plain-text report of duplicate groups and scan diagnostics.
//!
//! Groups and diagnostics are written to separate writers so that the
//! report on stdout can be piped or parsed without error text mixed in.
//!
//! # Format
//!
//! ```text
//! Duplicate group (af1349b9...):
//!   /data/a.txt
//!   /data/b.txt
//!
//! ```
//!
//! Diagnostics are one line each:
//!
//! ```text
//! error: /data/locked.txt: permission denied
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use dupescan::output::TextOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = TextOutput::new(&groups, &summary.errors);
//! output.write_groups(std::io::stdout().lock()).unwrap();
//! output.write_diagnostics(std::io::stderr().lock()).unwrap();
//! ```

use std::io;

use crate::duplicates::DuplicateGroup;
use crate::scanner::ScanError;

/// Text report formatter.
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    errors: &'a [ScanError],
}

impl<'a> TextOutput<'a> {
    /// Create a new text formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], errors: &'a [ScanError]) -> Self {
        Self { groups, errors }
    }

    /// Write every group with two or more members.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the writer.
    pub fn write_groups<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        for group in self.groups.iter().filter(|g| g.len() > 1) {
            writeln!(writer, "Duplicate group ({}):", group.digest)?;
            for path in &group.files {
                writeln!(writer, "  {}", path.display())?;
            }
            writeln!(writer)?;
        }
        writer.flush()
    }

    /// Write one line per recovered error.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the writer.
    pub fn write_diagnostics<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        for error in self.errors {
            writeln!(writer, "error: {}", error)?;
        }
        writer.flush()
    }

    /// Render the group report as a string.
    #[must_use]
    pub fn groups_to_string(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_groups(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
