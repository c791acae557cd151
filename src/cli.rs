//! CLI argument definitions using clap with subcommand architecture

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::discovery::DiscoveryOptions;

/// Compare sequential and worker-pool variable indexing over a source tree
#[derive(Parser, Debug)]
#[command(name = "parindex")]
#[command(about = "Benchmark sequential vs. worker-pool variable indexing")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (applies to all commands)
    #[arg(short, long, default_value = "text", value_enum, global = true)]
    pub format: OutputFormat,

    /// Show verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: ./parindex.toml, then the user config dir)
    #[arg(long, global = true, env = "PARINDEX_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full sequential vs. pool benchmark
    #[command(visible_alias = "b")]
    Bench(BenchArgs),

    /// Run one indexing pass and print index statistics
    #[command(visible_alias = "i")]
    Index(IndexArgs),

    /// List the files that would be indexed
    Files(FilesArgs),
}

// ============================================
// Shared discovery arguments
// ============================================

/// Discovery flags shared by every subcommand. Unset flags keep the
/// configuration file's values.
#[derive(Args, Debug, Clone, Default)]
pub struct DiscoveryArgs {
    /// Maximum directory depth to walk
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Only index these extensions (repeatable, e.g. --ext rs --ext py)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Glob overrides; prefix with ! to exclude (repeatable)
    #[arg(long = "glob", short = 'g', value_name = "GLOB")]
    pub globs: Vec<String>,

    /// Include hidden files and directories
    #[arg(long)]
    pub hidden: bool,

    /// Do not respect .gitignore and .ignore files
    #[arg(long)]
    pub no_ignore: bool,
}

impl DiscoveryArgs {
    /// Overlay these flags onto configured discovery options
    pub fn apply(&self, mut options: DiscoveryOptions) -> DiscoveryOptions {
        if let Some(depth) = self.max_depth {
            options.max_depth = depth;
        }
        if !self.extensions.is_empty() {
            options.extensions = self.extensions.clone();
        }
        if !self.globs.is_empty() {
            options.globs = self.globs.clone();
        }
        if self.hidden {
            options.hidden = true;
        }
        if self.no_ignore {
            options.respect_ignore = false;
        }
        options
    }
}

// ============================================
// Subcommands
// ============================================

#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Roots to index (default: configured roots, else the current directory)
    #[arg(value_name = "PATH")]
    pub roots: Vec<PathBuf>,

    #[command(flatten)]
    pub discovery: DiscoveryArgs,

    /// Pool sizes to benchmark (the core count is always added)
    #[arg(long, value_delimiter = ',', value_name = "N,..")]
    pub workers: Vec<usize>,

    /// Upper bound on the recommended worker count
    #[arg(long, value_name = "N")]
    pub recommended_cap: Option<usize>,
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Roots to index (default: configured roots, else the current directory)
    #[arg(value_name = "PATH")]
    pub roots: Vec<PathBuf>,

    #[command(flatten)]
    pub discovery: DiscoveryArgs,

    /// Worker threads; 0 runs sequentially
    #[arg(short = 'j', long, default_value_t = 0)]
    pub jobs: usize,

    /// Print the locations recorded for this variable name
    #[arg(long, value_name = "NAME")]
    pub lookup: Option<String>,
}

#[derive(Args, Debug)]
pub struct FilesArgs {
    /// Roots to walk (default: configured roots, else the current directory)
    #[arg(value_name = "PATH")]
    pub roots: Vec<PathBuf>,

    #[command(flatten)]
    pub discovery: DiscoveryArgs,
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    #[value(alias = "pretty")]
    Text,
    /// JSON for machine parsing
    Json,
}
