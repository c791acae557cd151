//! Bench command handler - full sequential vs. pool comparison

use std::sync::Arc;

use crate::cli::{BenchArgs, OutputFormat};
use crate::commands::{to_json, CommandContext};
use crate::config::WorkerConfig;
use crate::driver::BenchmarkDriver;
use crate::error::{BenchError, Result};
use crate::index::VariableIndex;
use crate::task::IndexingTask;

/// Run the bench command
pub fn run_bench(args: &BenchArgs, ctx: &CommandContext) -> Result<String> {
    let workers = worker_config(args, &ctx.config.workers)?;
    let discoverer = ctx.discoverer(&args.discovery)?;
    let roots = ctx.resolve_roots(&args.roots);

    let task = IndexingTask::new(Arc::new(VariableIndex::new()));
    let driver = BenchmarkDriver::new(discoverer, task, &workers);
    let report = driver.run(&roots)?;

    match ctx.format {
        OutputFormat::Text => Ok(report.render_text()),
        OutputFormat::Json => to_json(&report),
    }
}

/// Configured worker settings with CLI overrides applied
fn worker_config(args: &BenchArgs, configured: &WorkerConfig) -> Result<WorkerConfig> {
    let mut workers = configured.clone();
    if !args.workers.is_empty() {
        workers.counts = args.workers.clone();
    }
    if let Some(cap) = args.recommended_cap {
        workers.recommended_cap = cap;
    }

    if workers.counts.contains(&0) || workers.recommended_cap == 0 {
        return Err(BenchError::InvalidWorkerCount { count: 0 });
    }
    Ok(workers)
}
