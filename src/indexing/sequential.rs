//! Single-threaded baseline

use crate::discovery::FileReference;
use crate::error::Result;
use crate::indexing::IndexRunner;
use crate::task::{IndexingTask, RunTally};

/// Runs the task over every file, in input order, on the calling thread
#[derive(Debug, Clone, Copy)]
pub struct SequentialRunner<'a> {
    task: &'a IndexingTask,
}

impl<'a> SequentialRunner<'a> {
    pub fn new(task: &'a IndexingTask) -> Self {
        Self { task }
    }
}

impl IndexRunner for SequentialRunner<'_> {
    fn worker_count(&self) -> usize {
        0
    }

    fn run(&self, files: &[FileReference]) -> Result<RunTally> {
        let mut tally = RunTally::default();
        for file in files {
            tally.record(self.task.process(file));
        }
        tracing::debug!(
            "Sequential run: {} indexed, {} discarded",
            tally.indexed,
            tally.discarded()
        );
        Ok(tally)
    }
}
