//! Error types and exit codes for parindex
//!
//! Only harness-level failures live here. Per-file failures never become a
//! `BenchError`: they are absorbed by [`crate::task::IndexingTask`] and
//! reported as a [`crate::task::DiscardReason`].

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for parindex operations
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    #[error("Unsupported language for extension: {extension}")]
    UnsupportedLanguage { extension: String },

    #[error("Failed to parse file: {message}")]
    ParseFailure { message: String },

    #[error("Worker count must be at least 1 (got {count})")]
    InvalidWorkerCount { count: usize },

    #[error("Failed to spawn worker {worker_id}: {source}")]
    WorkerSpawn {
        worker_id: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("A worker thread panicked during the indexing run")]
    WorkerPanicked,

    #[error("IO error at {path}: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// Convert error to the process exit code:
    /// - 0: Success
    /// - 1: IO error
    /// - 2: Configuration / invalid argument
    /// - 3: Parse failure
    /// - 4: Worker pool failure
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::IoError { .. } | Self::Io(_) => ExitCode::from(1),
            Self::ConfigError { .. }
            | Self::InvalidGlob { .. }
            | Self::InvalidWorkerCount { .. }
            | Self::UnsupportedLanguage { .. } => ExitCode::from(2),
            Self::ParseFailure { .. } => ExitCode::from(3),
            Self::WorkerSpawn { .. } | Self::WorkerPanicked => ExitCode::from(4),
        }
    }
}

/// Result type alias for parindex operations
pub type Result<T> = std::result::Result<T, BenchError>;
