//! parindex configuration management.
//!
//! Configuration is read from the first of:
//! - the path given with `--config` (must exist)
//! - `./parindex.toml`
//! - `<config dir>/parindex/config.toml` (e.g. `~/.config/parindex/config.toml`)
//!
//! and falls back to defaults when none exists. CLI flags are applied on top
//! by the command handlers.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::DiscoveryOptions;
use crate::error::{BenchError, Result};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "parindex.toml";

/// Worker counts benchmarked by default, before adding the core count
pub const DEFAULT_WORKER_COUNTS: [usize; 3] = [2, 4, 8];

/// Upper bound for the recommended configuration
pub const DEFAULT_RECOMMENDED_CAP: usize = 8;

/// parindex configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Roots to index when none are given on the command line
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    #[serde(default)]
    pub discovery: DiscoveryOptions,

    #[serde(default)]
    pub workers: WorkerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Worker-count configurations to benchmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Pool sizes to time; the core count is always added and values above
    /// it are dropped
    #[serde(default = "default_worker_counts")]
    pub counts: Vec<usize>,

    /// The recommended run uses min(core count, recommended_cap) workers
    #[serde(default = "default_recommended_cap")]
    pub recommended_cap: usize,
}

fn default_worker_counts() -> Vec<usize> {
    DEFAULT_WORKER_COUNTS.to_vec()
}

fn default_recommended_cap() -> usize {
    DEFAULT_RECOMMENDED_CAP
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            counts: default_worker_counts(),
            recommended_cap: default_recommended_cap(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl BenchConfig {
    /// Load from an explicit path, or search the default locations.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(BenchError::ConfigError {
                    message: format!("Config file not found: {}", path.display()),
                });
            }
            return Self::load_from(path);
        }

        for candidate in Self::search_paths() {
            if candidate.exists() {
                tracing::debug!("Using config file {}", candidate.display());
                return Self::load_from(&candidate);
            }
        }
        Ok(Self::default())
    }

    /// Default lookup locations, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("parindex").join("config.toml"));
        }
        paths
    }

    /// Load configuration from a specific path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| BenchError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| BenchError::ConfigError {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the harness cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers.counts.contains(&0) {
            return Err(BenchError::ConfigError {
                message: "workers.counts must not contain 0".to_string(),
            });
        }
        if self.workers.recommended_cap == 0 {
            return Err(BenchError::ConfigError {
                message: "workers.recommended_cap must be at least 1".to_string(),
            });
        }
        if !["error", "warn", "info", "debug", "trace"].contains(&self.logging.level.as_str()) {
            return Err(BenchError::ConfigError {
                message: format!(
                    "Invalid log level: {}. Must be one of: error, warn, info, debug, trace",
                    self.logging.level
                ),
            });
        }
        Ok(())
    }
}
