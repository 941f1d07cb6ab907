//! Output formatters for duplicate scan results.
//!
//! Results are plain text: the group report goes to stdout and the
//! diagnostics to stderr, see [`text`].

pub mod text;

// Re-export main types
pub use text::TextOutput;
