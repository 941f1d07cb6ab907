//! Ctrl+C handling.
//!
//! A single `Arc<AtomicBool>` is set when the user interrupts the scan. The
//! walker, every hashing worker and the hasher's read loop poll it, so an
//! interrupt stops new work, lets in-flight reads end at the next chunk, and
//! makes the finder return [`crate::duplicates::FinderError::Interrupted`].
//!
//! ```rust,no_run
//! use dupescan::duplicates::FinderConfig;
//! use dupescan::signal::install_handler;
//!
//! let handler = install_handler().expect("signal handler");
//! let config = FinderConfig::default().with_shutdown_flag(handler.get_flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C was pressed or [`request_shutdown`](Self::request_shutdown) was called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Set the flag by hand.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the flag for the finder, walker and hasher.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag so the handler can be reused by another run.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C handler, or reuse the installed one.
///
/// The OS hook can only be registered once per process. Later calls return
/// the same handler with its flag cleared, so `run_app` can be invoked
/// repeatedly (as the integration tests do).
///
/// # Errors
///
/// Returns [`SignalError`] if the hook cannot be registered and no handler
/// has been installed yet.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    let installed = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\nInterrupted. Stopping scan...");
        let _ = stderr.flush();
    });

    match installed {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(handler)
        }
        // Another thread won the race to register the hook
        Err(ctrlc::Error::MultipleHandlers) => match GLOBAL_HANDLER.get() {
            Some(existing) => {
                existing.reset();
                Ok(existing.clone())
            }
            None => {
                log::debug!("Ctrl+C handler registered elsewhere, using unhooked handler");
                Ok(GLOBAL_HANDLER.get_or_init(ShutdownHandler::new).clone())
            }
        },
        Err(e) => Err(SignalError::InstallFailed(e)),
    }
}
