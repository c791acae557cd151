//! Fixed-size worker pool with poison-pill termination
//!
//! Every file and then exactly one [`WorkItem::PoisonPill`] per worker are
//! pushed onto a single unbounded crossbeam channel before any worker starts.
//! Each worker pops until it receives a pill, so every worker observes exactly
//! one termination signal and no worker can block on an exhausted queue.
//! The run returns only after every worker has been joined.
//!
//! The shared index is written concurrently by all workers with no locking
//! here; the index synchronizes itself.

use crossbeam::channel::{self, Receiver};

use crate::discovery::FileReference;
use crate::error::{BenchError, Result};
use crate::indexing::IndexRunner;
use crate::task::{IndexingTask, RunTally};

/// One entry of the shared work queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem {
    File(FileReference),
    /// No more work: the worker that pops this exits
    PoisonPill,
}

/// Runs the task over a file set with `worker_count` threads
#[derive(Debug, Clone, Copy)]
pub struct WorkerPoolRunner<'a> {
    task: &'a IndexingTask,
    worker_count: usize,
}

impl<'a> WorkerPoolRunner<'a> {
    /// Create a pool runner. `worker_count` must be at least 1.
    pub fn new(task: &'a IndexingTask, worker_count: usize) -> Result<Self> {
        if worker_count == 0 {
            return Err(BenchError::InvalidWorkerCount { count: 0 });
        }
        Ok(Self { task, worker_count })
    }
}

impl IndexRunner for WorkerPoolRunner<'_> {
    fn worker_count(&self) -> usize {
        self.worker_count
    }

    fn run(&self, files: &[FileReference]) -> Result<RunTally> {
        let (work_tx, work_rx) = channel::unbounded::<WorkItem>();

        for file in files {
            // Cannot fail: the receiver is alive for the whole run
            let _ = work_tx.send(WorkItem::File(file.clone()));
        }
        for _ in 0..self.worker_count {
            let _ = work_tx.send(WorkItem::PoisonPill);
        }
        drop(work_tx);

        let task = self.task;
        let worker_count = self.worker_count;

        let tally = crossbeam::thread::scope(|s| -> Result<RunTally> {
            let mut handles = Vec::with_capacity(worker_count);
            for worker_id in 0..worker_count {
                let queue = work_rx.clone();
                let handle = s
                    .builder()
                    .name(format!("index-worker-{}", worker_id))
                    .spawn(move |_| run_worker(&queue, task))
                    .map_err(|source| BenchError::WorkerSpawn { worker_id, source })?;
                handles.push(handle);
            }

            let mut tally = RunTally::default();
            for handle in handles {
                let worker_tally = handle.join().map_err(|_| BenchError::WorkerPanicked)?;
                tally.merge(&worker_tally);
            }
            Ok(tally)
        })
        .map_err(|_| BenchError::WorkerPanicked)??;

        tracing::debug!(
            "Pool run with {} workers: {} indexed, {} discarded, {} workers exited",
            worker_count,
            tally.indexed,
            tally.discarded(),
            tally.workers_exited
        );
        Ok(tally)
    }
}

/// Worker loop: pop until a poison pill arrives.
fn run_worker(queue: &Receiver<WorkItem>, task: &IndexingTask) -> RunTally {
    let mut tally = RunTally::default();
    loop {
        match queue.recv() {
            Ok(WorkItem::File(file)) => tally.record(task.process(&file)),
            Ok(WorkItem::PoisonPill) => {
                tally.workers_exited += 1;
                break;
            }
            // Disconnected and drained; unreachable while pills are enqueued
            Err(_) => break,
        }
    }
    tally
}
