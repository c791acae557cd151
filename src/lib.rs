//! parindex: sequential vs. worker-pool variable indexing benchmark
//!
//! This library discovers source files under one or more roots, parses each
//! with tree-sitter, and records every variable binding into a shared
//! in-memory index. The same file set is indexed once sequentially and then
//! by fixed-size worker pools, and the timings are compared.
//!
//! # Supported Languages
//!
//! - TypeScript, TSX, JavaScript, JSX
//! - Rust
//! - Python
//! - Go
//! - Java
//! - C, C++
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use parindex::{
//!     DiscoveryOptions, FileSetDiscoverer, IndexRunner, IndexingTask, VariableIndex,
//!     WorkerPoolRunner,
//! };
//!
//! let files = FileSetDiscoverer::new(DiscoveryOptions::default())?.discover(&["src".into()]);
//! let index = Arc::new(VariableIndex::new());
//! let task = IndexingTask::new(Arc::clone(&index));
//! let tally = WorkerPoolRunner::new(&task, 4)?.run(&files)?;
//! println!("{} files, {} variables", tally.indexed, index.variable_count());
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod index;
pub mod indexing;
pub mod lang;
pub mod metrics;
pub mod parsing;
pub mod report;
pub mod task;
pub mod visitor;

// Re-export commonly used types
pub use cli::{Cli, Commands, OutputFormat};
pub use config::BenchConfig;
pub use discovery::{DiscoveryOptions, FileReference, FileSetDiscoverer};
pub use driver::{plan_worker_counts, recommended_workers, BenchmarkDriver};
pub use error::{BenchError, Result};
pub use index::{VariableIndex, VariableLocation, VariableObservation};
pub use indexing::{IndexRunner, SequentialRunner, WorkItem, WorkerPoolRunner};
pub use lang::{Lang, LangFamily};
pub use metrics::{Metrics, MetricsCollector, RunResult};
pub use parsing::{SourceParser, TreeSitterParser};
pub use report::{BenchmarkReport, ConfigurationReport};
pub use task::{DiscardReason, FileOutcome, IndexingTask, RunTally};
pub use visitor::{Extractor, VariableExtractor, VariableVisitor};
