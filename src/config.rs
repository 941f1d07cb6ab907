//! Layered application configuration.
//!
//! Settings are resolved from, lowest to highest priority:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file: `--config <FILE>`, or `config.toml` in the platform
//!    config directory (for example `~/.config/dupescan/config.toml`)
//! 3. Environment variables prefixed with `DUPESCAN_` (e.g. `DUPESCAN_IO_THREADS=8`)
//! 4. Command-line flags
//!
//! ```toml
//! io_threads = 8
//! algorithm = "sha256"
//! sort = true
//! strict = false
//! skip_hidden = true
//! ignore_patterns = ["*.tmp", "node_modules/"]
//! respect_gitignore = false
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::duplicates::{FinderConfig, DEFAULT_IO_THREADS};
use crate::scanner::{HashAlgorithm, WalkerConfig};

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "DUPESCAN_";

/// Errors that can occur while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has the wrong shape.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of hashing worker threads
    pub io_threads: usize,
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
    /// Sort the report by path
    pub sort: bool,
    /// Exit with a partial-success code if any entry failed
    pub strict: bool,
    /// Skip hidden files and directories
    pub skip_hidden: bool,
    /// Additional gitignore-style patterns
    pub ignore_patterns: Vec<String>,
    /// Apply the root's `.gitignore`
    pub respect_gitignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            algorithm: HashAlgorithm::default(),
            sort: false,
            strict: false,
            skip_hidden: false,
            ignore_patterns: Vec::new(),
            respect_gitignore: false,
        }
    }
}

impl Config {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// `explicit` is the `--config` path. Without it the platform default
    /// path is used when that file exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `explicit` does not exist or any layer
    /// fails to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(explicit)?.extract()?;
        log::debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    /// Build the layered figment without extracting it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `explicit` does not exist.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                log::debug!("Loading config from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
                    log::debug!("Loading config from {}", path.display());
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Platform-specific default config file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupescan").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line overrides on top of the loaded layers.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(threads) = cli.io_threads {
            self.io_threads = usize::from(threads);
        }
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        // Boolean flags can only switch a setting on
        self.sort |= cli.sort;
        self.strict |= cli.strict;
        self.skip_hidden |= cli.skip_hidden;
        self.respect_gitignore |= cli.gitignore;
        self.ignore_patterns.extend(cli.ignore_patterns.iter().cloned());
        self
    }

    /// Translate into the finder's configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_io_threads(self.io_threads)
            .with_algorithm(self.algorithm)
            .with_sort(self.sort)
            .with_walker_config(
                WalkerConfig::new(self.skip_hidden, self.ignore_patterns.clone())
                    .with_respect_gitignore(self.respect_gitignore),
            )
    }
}
