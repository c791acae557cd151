//! Benchmark orchestration
//!
//! The run sequence is fixed so results stay comparable between machines:
//!
//! 1. discover the file set once
//! 2. clear the shared index
//! 3. warm up (clear only, nothing timed)
//! 4. time one sequential pass
//! 5. time one pool pass per planned worker count
//! 6. time one pool pass at the recommended worker count
//!
//! The index is cleared before every timed pass.

use std::path::PathBuf;

use crate::config::WorkerConfig;
use crate::discovery::{FileReference, FileSetDiscoverer};
use crate::error::Result;
use crate::indexing::{SequentialRunner, WorkerPoolRunner};
use crate::metrics::{MetricsCollector, RunResult};
use crate::report::{BenchmarkReport, ConfigurationReport};
use crate::task::IndexingTask;

/// Worker counts to benchmark: requested counts plus the core count,
/// deduplicated, ascending, none above the core count.
pub fn plan_worker_counts(requested: &[usize], core_count: usize) -> Vec<usize> {
    let core_count = core_count.max(1);
    let mut counts: Vec<usize> = requested
        .iter()
        .copied()
        .filter(|&c| c >= 1 && c <= core_count)
        .chain(std::iter::once(core_count))
        .collect();
    counts.sort_unstable();
    counts.dedup();
    counts
}

/// Worker count for the recommended configuration
pub fn recommended_workers(core_count: usize, cap: usize) -> usize {
    core_count.min(cap).max(1)
}

/// Runs the full sequential-vs-pool comparison
#[derive(Debug)]
pub struct BenchmarkDriver {
    discoverer: FileSetDiscoverer,
    task: IndexingTask,
    worker_counts: Vec<usize>,
    recommended_cap: usize,
    core_count: usize,
}

impl BenchmarkDriver {
    pub fn new(discoverer: FileSetDiscoverer, task: IndexingTask, workers: &WorkerConfig) -> Self {
        Self {
            discoverer,
            task,
            worker_counts: workers.counts.clone(),
            recommended_cap: workers.recommended_cap,
            core_count: num_cpus::get(),
        }
    }

    /// Override the detected core count
    pub fn with_core_count(mut self, core_count: usize) -> Self {
        self.core_count = core_count.max(1);
        self
    }

    pub fn core_count(&self) -> usize {
        self.core_count
    }

    pub fn run(&self, roots: &[PathBuf]) -> Result<BenchmarkReport> {
        let started_at = chrono::Utc::now();

        let files = self.discoverer.discover(roots);
        tracing::info!(
            "Benchmarking {} files on {} cores",
            files.len(),
            self.core_count
        );

        self.task.index().clear();
        self.warm_up();

        let baseline = self.time_sequential(&files)?;
        tracing::info!("Sequential baseline: {:.3}s", baseline.elapsed_secs());

        let mut configurations = Vec::new();
        for workers in plan_worker_counts(&self.worker_counts, self.core_count) {
            let result = self.time_pool(&files, workers)?;
            self.check_consistency(&baseline, &result);
            configurations.push(ConfigurationReport::new(&baseline, result));
        }

        let recommended_count = recommended_workers(self.core_count, self.recommended_cap);
        let result = self.time_pool(&files, recommended_count)?;
        self.check_consistency(&baseline, &result);
        let recommended = ConfigurationReport::new(&baseline, result);

        Ok(BenchmarkReport {
            started_at,
            roots: roots.to_vec(),
            file_count: files.len(),
            core_count: self.core_count,
            baseline,
            configurations,
            recommended,
        })
    }

    fn warm_up(&self) {
        self.task.index().clear();
    }

    fn time_sequential(&self, files: &[FileReference]) -> Result<RunResult> {
        self.task.index().clear();
        MetricsCollector::measure(&SequentialRunner::new(&self.task), files)
    }

    fn time_pool(&self, files: &[FileReference], workers: usize) -> Result<RunResult> {
        self.task.index().clear();
        let runner = WorkerPoolRunner::new(&self.task, workers)?;
        let result = MetricsCollector::measure(&runner, files)?;
        tracing::info!("{} workers: {:.3}s", workers, result.elapsed_secs());
        Ok(result)
    }

    fn check_consistency(&self, baseline: &RunResult, result: &RunResult) {
        if result.tally.indexed != baseline.tally.indexed {
            tracing::warn!(
                "{} workers indexed {} files but the sequential baseline indexed {}",
                result.worker_count,
                result.tally.indexed,
                baseline.tally.indexed
            );
        }
    }
}
