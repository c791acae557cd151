//! Index-building strategies
//!
//! Both strategies feed every [`FileReference`] through the same
//! [`IndexingTask`], so they differ only in how work is scheduled:
//!
//! - [`SequentialRunner`] processes files one by one on the calling thread.
//!   It is the baseline every speedup is measured against.
//! - [`WorkerPoolRunner`] distributes files over a fixed number of worker
//!   threads through a shared FIFO queue terminated by poison pills.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use parindex::indexing::{IndexRunner, SequentialRunner, WorkerPoolRunner};
//! use parindex::{IndexingTask, VariableIndex};
//!
//! let index = Arc::new(VariableIndex::new());
//! let task = IndexingTask::new(Arc::clone(&index));
//!
//! let tally = WorkerPoolRunner::new(&task, 4)?.run(&files)?;
//! println!("indexed {} files, discarded {}", tally.indexed, tally.discarded());
//! ```

pub mod pool;
pub mod sequential;

pub use pool::{WorkItem, WorkerPoolRunner};
pub use sequential::SequentialRunner;

use crate::discovery::FileReference;
use crate::error::Result;
use crate::task::RunTally;

/// A strategy for running the indexing task over a file set
pub trait IndexRunner {
    /// Number of concurrent workers; 0 means the calling thread only
    fn worker_count(&self) -> usize;

    /// Process every file, returning only once all work has finished
    fn run(&self, files: &[FileReference]) -> Result<RunTally>;
}
