//! Logging setup for dupescan.
//!
//! Log records go to stderr through the `log` facade and `env_logger`, so
//! they never mix with the duplicate report on stdout. The level comes from
//! (highest priority first):
//!
//! 1. The `RUST_LOG` environment variable
//! 2. `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. The default, warnings and above
//!
//! Per-file failures are logged at debug level; the report prints them once
//! as diagnostics, so the default level keeps stderr to one line per error.
//!
//! ```rust,no_run
//! use dupescan::logging::init_logging;
//!
//! // -v
//! init_logging(1, false);
//! log::debug!("visible");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logger from CLI verbosity flags.
///
/// Only the first call in a process installs a logger; later calls
/// (for example from tests that run the application repeatedly) are no-ops.
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - Errors only (overridden by `RUST_LOG`)
pub fn init_logging(verbose: u8, quiet: bool) {
    let rust_log = env::var("RUST_LOG").ok();

    let mut builder = Builder::new();
    match &rust_log {
        Some(_) => {
            builder.parse_default_env();
        }
        None => {
            builder.filter_level(determine_level(verbose, quiet));
        }
    }
    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        return;
    }

    match rust_log {
        Some(spec) => log::debug!("Logging initialized from RUST_LOG={}", spec),
        None => log::debug!(
            "Logging initialized at level: {}",
            current_level_name()
        ),
    }
}

/// Map the CLI flags to a level filter. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Debug builds get timestamps, plus the module path with `-v`.
/// Release builds print level and message only.
fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let timestamp = buf.timestamp_seconds();
            let level = record.level();
            let style = buf.default_level_style(level);

            if verbose >= 1 {
                writeln!(
                    buf,
                    "{} {style}{:<5}{style:#} [{}] {}",
                    timestamp,
                    level,
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{} {style}{:<5}{style:#} {}",
                    timestamp,
                    level,
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
        });
    }
}

/// Name of the currently active maximum log level.
#[must_use]
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
