//! Exit codes.

use crate::duplicates::ScanSummary;

/// Exit codes for the dupescan application.
///
/// - 0: Success (scan completed; duplicates may or may not have been found)
/// - 1: General error (including a missing or unreadable scan root)
/// - 3: Partial success (some files failed to hash and `--strict` is set)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: Scan completed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Partial success: Scan completed but some entries could not be processed.
    PartialSuccess = 3,
    /// Interrupted: Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Exit code for a completed scan under the given failure policy.
    ///
    /// Recovered errors only change the exit code when `strict` is set.
    #[must_use]
    pub fn for_scan(summary: &ScanSummary, strict: bool) -> Self {
        if strict && summary.has_errors() {
            Self::PartialSuccess
        } else {
            Self::Success
        }
    }

    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::PartialSuccess => "DS003",
            Self::Interrupted => "DS130",
        }
    }
}
