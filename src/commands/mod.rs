//! Command modules for the parindex CLI
//!
//! Each command module implements a single top-level command:
//! - `bench` - Full sequential vs. worker-pool benchmark
//! - `index` - One indexing pass plus index statistics
//! - `files` - List discovered files
//!
//! All command handlers take their `Args` struct from `cli.rs` and a shared
//! `CommandContext`, and return the text to print on stdout.

pub mod bench;
pub mod files;
pub mod index;

pub use bench::run_bench;
pub use files::run_files;
pub use index::run_index;

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{DiscoveryArgs, OutputFormat};
use crate::config::BenchConfig;
use crate::discovery::FileSetDiscoverer;
use crate::error::{BenchError, Result};

/// Shared context passed to all command handlers
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub verbose: bool,
    pub config: BenchConfig,
}

impl CommandContext {
    pub fn new(format: OutputFormat, verbose: bool, config: BenchConfig) -> Self {
        Self {
            format,
            verbose,
            config,
        }
    }

    /// Roots from the command line, else the configured ones, else `.`
    pub fn resolve_roots(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        if !roots.is_empty() {
            roots.to_vec()
        } else if !self.config.roots.is_empty() {
            self.config.roots.clone()
        } else {
            vec![PathBuf::from(".")]
        }
    }

    /// Build a discoverer from the configured options with CLI overrides
    pub fn discoverer(&self, args: &DiscoveryArgs) -> Result<FileSetDiscoverer> {
        FileSetDiscoverer::new(args.apply(self.config.discovery.clone()))
    }
}

/// Serialize a value as pretty JSON with a trailing newline
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map(|json| format!("{}\n", json))
        .map_err(|e| BenchError::ConfigError {
            message: format!("JSON serialization failed: {}", e),
        })
}
