//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to display a spinner on stderr while a scan runs.
//! Discovery and hashing overlap, so a single spinner shows both counts
//! instead of one bar per phase.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress callback for the scan pipeline.
///
/// Implement this trait to receive progress updates. Methods may be called
/// from worker threads concurrently.
pub trait ProgressCallback: Send + Sync {
    /// Called once before traversal begins.
    fn on_scan_start(&self, root: &str);

    /// Called when the walker hands a file to the worker pool.
    fn on_file_discovered(&self, path: &str);

    /// Called when a worker has finished with a file, successfully or not.
    fn on_file_done(&self, path: &str, ok: bool);

    /// Called once after every worker has joined.
    fn on_scan_end(&self);
}

/// Spinner-based progress reporter.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    discovered: AtomicU64,
    done: AtomicU64,
    failed: AtomicU64,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupescan::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            discovered: AtomicU64::new(0),
            done: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            quiet,
        }
    }

    /// Files handed to workers so far.
    #[must_use]
    pub fn discovered(&self) -> u64 {
        self.discovered.load(Ordering::Relaxed)
    }

    /// Files finished so far (hashed or failed).
    #[must_use]
    pub fn done(&self) -> u64 {
        self.done.load(Ordering::Relaxed)
    }

    /// Files that failed to hash so far.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn status(&self) -> String {
        let failed = self.failed();
        if failed == 0 {
            format!("{}/{} files hashed", self.done(), self.discovered())
        } else {
            format!(
                "{}/{} files hashed ({} failed)",
                self.done(),
                self.discovered(),
                failed
            )
        }
    }

    fn refresh(&self, path: &str) {
        let guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ref pb) = *guard {
            pb.set_message(format!("{} {}", self.status(), truncate_path(path, 40)));
        }
    }
}

impl ProgressCallback for Progress {
    fn on_scan_start(&self, root: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        pb.set_style(Self::style());
        pb.set_message(format!("Scanning {}", root));
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_file_discovered(&self, path: &str) {
        self.discovered.fetch_add(1, Ordering::Relaxed);
        if !self.quiet {
            self.refresh(path);
        }
    }

    fn on_file_done(&self, path: &str, ok: bool) {
        self.done.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        if !self.quiet {
            self.refresh(path);
        }
    }

    fn on_scan_end(&self) {
        let taken = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pb) = taken {
            // Clear so the report on stdout is not interleaved with the spinner
            pb.finish_and_clear();
        }
    }
}

/// Truncate a path for display next to the spinner.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}
