//! Run timing and derived performance metrics
//!
//! A [`RunResult`] is produced once per timed run. [`Metrics::derive`] compares
//! a comparand run against the sequential baseline. Quotients whose
//! denominator is below [`MIN_MEASURABLE_SECS`] are reported as undefined
//! (`None`) instead of infinities or NaNs.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::discovery::FileReference;
use crate::error::Result;
use crate::indexing::IndexRunner;
use crate::task::RunTally;

/// Elapsed times below this are too small to divide by
pub const MIN_MEASURABLE_SECS: f64 = 1e-6;

/// Outcome of one timed run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunResult {
    /// 0 for the sequential baseline
    pub worker_count: usize,
    #[serde(serialize_with = "serialize_secs", rename = "elapsed_secs")]
    pub elapsed: Duration,
    pub tally: RunTally,
}

fn serialize_secs<S: serde::Serializer>(
    elapsed: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

impl RunResult {
    pub fn new(worker_count: usize, elapsed: Duration) -> Self {
        Self {
            worker_count,
            elapsed,
            tally: RunTally::default(),
        }
    }

    pub fn with_tally(mut self, tally: RunTally) -> Self {
        self.tally = tally;
        self
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Comparison of one run against the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    /// baseline / comparand
    pub speedup: Option<f64>,
    /// speedup / workers, as a percentage
    pub efficiency: Option<f64>,
    /// baseline − comparand, in seconds (negative when slower)
    pub time_saved: f64,
    /// time_saved as a percentage of the baseline
    pub percent_faster: Option<f64>,
}

impl Metrics {
    pub fn derive(baseline: &RunResult, comparand: &RunResult, worker_count: usize) -> Self {
        let base = baseline.elapsed_secs();
        let other = comparand.elapsed_secs();

        let speedup = (other >= MIN_MEASURABLE_SECS).then(|| base / other);
        let efficiency = speedup
            .filter(|_| worker_count > 0)
            .map(|s| s / worker_count as f64 * 100.0);
        let time_saved = base - other;
        let percent_faster = (base >= MIN_MEASURABLE_SECS).then(|| time_saved / base * 100.0);

        Self {
            speedup,
            efficiency,
            time_saved,
            percent_faster,
        }
    }
}

/// Times runs with a monotonic wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCollector;

impl MetricsCollector {
    /// Run `op` and return its value with the elapsed wall-clock time.
    pub fn time<T>(op: impl FnOnce() -> T) -> (T, Duration) {
        let start = Instant::now();
        let value = op();
        (value, start.elapsed())
    }

    /// Time one pass of `runner` over `files`.
    pub fn measure(runner: &dyn IndexRunner, files: &[FileReference]) -> Result<RunResult> {
        let (tally, elapsed) = Self::time(|| runner.run(files));
        let tally = tally?;
        tracing::debug!(
            "Run with {} workers took {:.3}s",
            runner.worker_count(),
            elapsed.as_secs_f64()
        );
        Ok(RunResult::new(runner.worker_count(), elapsed).with_tally(tally))
    }
}

/// Format an optional metric, `n/a` when undefined
pub fn format_optional(value: Option<f64>, precision: usize, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.*}{}", precision, v, suffix),
        None => "n/a".to_string(),
    }
}
