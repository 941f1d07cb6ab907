//! dupescan - concurrent duplicate file scanner
//!
//! Walks a directory tree, hashes every regular file on a bounded pool of
//! worker threads, and groups files whose content digests are identical.
//!
//! The pipeline is:
//!
//! 1. [`scanner::Walker`] yields regular files and recoverable traversal errors
//! 2. [`duplicates::DuplicateFinder`] hashes each file as a unit of work on a
//!    rayon pool and records it in a shared [`duplicates::DigestTable`]
//! 3. After every unit has joined, the table is reduced to
//!    [`duplicates::DuplicateGroup`]s and printed by [`output::TextOutput`]
//!
//! ```no_run
//! use dupescan::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(8));
//! let (groups, summary) = finder.find_duplicates(Path::new("/data")).unwrap();
//! for group in &groups {
//!     println!("{}: {} copies", group.digest, group.len());
//! }
//! println!("{} errors", summary.errors.len());
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::output::TextOutput;
use crate::progress::Progress;

/// Run a complete scan for parsed command-line arguments.
///
/// The report goes to stdout and one diagnostic line per recovered error
/// goes to stderr.
///
/// # Errors
///
/// Returns an error for invalid configuration, a missing or unreadable
/// root, an interrupted scan, or a failure writing the report.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?.with_cli_overrides(&cli);
    log::debug!(
        "Scanning {} with {} threads ({})",
        cli.path.display(),
        config.io_threads,
        config.algorithm
    );

    let handler = signal::install_handler()?;
    let progress = Arc::new(Progress::new(cli.quiet || cli.no_progress));

    let finder_config = config
        .finder_config()
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(progress);
    let finder = DuplicateFinder::new(finder_config);

    let (groups, summary) = finder.find_duplicates(&cli.path)?;

    let output = TextOutput::new(&groups, &summary.errors);
    output
        .write_groups(io::stdout().lock())
        .context("Failed to write report")?;
    output
        .write_diagnostics(io::stderr().lock())
        .context("Failed to write diagnostics")?;

    Ok(ExitCode::for_scan(&summary, config.strict))
}
