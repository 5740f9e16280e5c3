use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{ScanError, ScanResult};

/// One mebibyte, for the `--megabytes` capacity flag.
pub const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;
/// One gibibyte, for the `--gigabytes` capacity flag.
pub const BYTES_PER_GIGABYTE: u64 = BYTES_PER_MEGABYTE * 1024;

/// Configuration for a scan run.
///
/// Values can be loaded from YAML config files in order of precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.seqscout.yaml` in the current directory
/// 3. Global `$HOME/.config/seqscout/config.yaml`
///
/// CLI arguments take precedence over config file values; the merging
/// behavior is defined in [`ScanConfig::merge_with_cli`]. Example file:
///
/// ```yaml
/// # Literal pattern to search for
/// pattern: "GATTACA"
///
/// # Arena capacity in bytes; must cover all input files
/// capacity_bytes: 4294967296
///
/// # Worker threads (default: CPU cores)
/// thread_count: 8
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// The literal byte pattern to search for
    #[serde(default)]
    pub pattern: String,

    /// Fixed arena capacity in bytes; the buffer never grows past this
    #[serde(default)]
    pub capacity_bytes: u64,

    /// Number of worker threads for the scan
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Emit a context line for every match
    #[serde(default)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Sequence files to load, concatenated in order
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            capacity_bytes: 0,
            thread_count: default_thread_count(),
            verbose: false,
            log_level: default_log_level(),
            files: Vec::new(),
        }
    }
}

impl ScanConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("seqscout/config.yaml")),
            // Local config
            Some(PathBuf::from(".seqscout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(
        mut self,
        cli_config: ScanConfig,
        cli_threads: Option<NonZeroUsize>,
    ) -> Self {
        // CLI values take precedence over config file values
        if !cli_config.pattern.is_empty() {
            self.pattern = cli_config.pattern;
        }
        if cli_config.capacity_bytes != 0 {
            self.capacity_bytes = cli_config.capacity_bytes;
        }
        if !cli_config.files.is_empty() {
            self.files = cli_config.files;
        }
        if cli_config.verbose {
            self.verbose = true;
        }
        // Thread count falls back from an explicit CLI flag to the file
        // value to the CPU-count default baked into `Default`.
        if let Some(threads) = cli_threads {
            self.thread_count = threads;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }

    /// Rejects configurations that cannot start a run: a missing pattern,
    /// a zero capacity budget, or no input files.
    pub fn validate(&self) -> ScanResult<()> {
        if self.pattern.is_empty() {
            return Err(ScanError::config_error("no search pattern specified"));
        }
        if self.capacity_bytes == 0 {
            return Err(ScanError::config_error(
                "no buffer capacity specified (use -b, -m, or -g)",
            ));
        }
        if self.files.is_empty() {
            return Err(ScanError::config_error("no sequence files specified"));
        }
        Ok(())
    }
}
