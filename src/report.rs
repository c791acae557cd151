//! Benchmark report rendering (text and JSON)

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::metrics::{format_optional, Metrics, RunResult};

/// One pool configuration compared against the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfigurationReport {
    #[serde(flatten)]
    pub run: RunResult,
    #[serde(flatten)]
    pub metrics: Metrics,
}

impl ConfigurationReport {
    pub fn new(baseline: &RunResult, run: RunResult) -> Self {
        let metrics = Metrics::derive(baseline, &run, run.worker_count);
        Self { run, metrics }
    }
}

/// Complete result of a benchmark session
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub started_at: DateTime<Utc>,
    pub roots: Vec<PathBuf>,
    pub file_count: usize,
    pub core_count: usize,
    pub baseline: RunResult,
    pub configurations: Vec<ConfigurationReport>,
    pub recommended: ConfigurationReport,
}

impl BenchmarkReport {
    /// Configuration with the highest speedup, if any speedup is defined
    pub fn fastest(&self) -> Option<&ConfigurationReport> {
        self.configurations
            .iter()
            .filter(|c| c.metrics.speedup.is_some())
            .max_by(|a, b| {
                let a = a.metrics.speedup.unwrap_or(0.0);
                let b = b.metrics.speedup.unwrap_or(0.0);
                a.total_cmp(&b)
            })
    }

    pub fn render_text(&self) -> String {
        let mut output = String::new();

        output.push_str("═══════════════════════════════════════════════════════\n");
        output.push_str("  PARALLEL INDEXING BENCHMARK\n");
        output.push_str("═══════════════════════════════════════════════════════\n\n");

        output.push_str(&format!(
            "  Started:            {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("  Files:              {}\n", self.file_count));
        output.push_str(&format!("  CPU cores:          {}\n\n", self.core_count));

        let base = &self.baseline.tally;
        output.push_str("SEQUENTIAL BASELINE:\n");
        output.push_str(&format!(
            "  Time:               {:.3}s\n",
            self.baseline.elapsed_secs()
        ));
        output.push_str(&format!(
            "  Indexed:            {} files, {} variables\n",
            base.indexed, base.variables
        ));
        if base.discarded() > 0 {
            output.push_str(&format!(
                "  Discarded:          {} (missing {}, unsupported {}, unreadable {}, parse {}, visit {}, panicked {})\n",
                base.discarded(),
                base.missing,
                base.unsupported,
                base.unreadable,
                base.parse_failed,
                base.visit_failed,
                base.panicked
            ));
        }
        output.push('\n');

        output.push_str("WORKER POOL:\n");
        output.push_str(&format!(
            "  {:<9} {:>10} {:>10} {:>12} {:>10}\n",
            "Workers", "Time", "Speedup", "Efficiency", "Indexed"
        ));
        for config in &self.configurations {
            output.push_str(&render_row(config));
        }
        output.push('\n');

        let rec = &self.recommended;
        output.push_str(&format!(
            "RECOMMENDED ({} workers):\n",
            rec.run.worker_count
        ));
        output.push_str(&format!("  Time:               {:.3}s\n", rec.run.elapsed_secs()));
        output.push_str(&format!(
            "  Speedup:            {}\n",
            format_optional(rec.metrics.speedup, 2, "x")
        ));
        output.push_str(&format!(
            "  Efficiency:         {}\n\n",
            format_optional(rec.metrics.efficiency, 1, "%")
        ));

        output.push_str("SUMMARY:\n");
        output.push_str(&format!(
            "  Time saved:         {:.3}s\n",
            rec.metrics.time_saved
        ));
        output.push_str(&format!(
            "  Percent faster:     {}\n",
            format_optional(rec.metrics.percent_faster, 1, "%")
        ));
        if let Some(fastest) = self.fastest() {
            output.push_str(&format!(
                "  Fastest pool:       {} workers ({})\n",
                fastest.run.worker_count,
                format_optional(fastest.metrics.speedup, 2, "x")
            ));
        }

        output
    }
}

fn render_row(config: &ConfigurationReport) -> String {
    format!(
        "  {:<9} {:>10} {:>10} {:>12} {:>10}\n",
        config.run.worker_count,
        format!("{:.3}s", config.run.elapsed_secs()),
        format_optional(config.metrics.speedup, 2, "x"),
        format_optional(config.metrics.efficiency, 1, "%"),
        config.run.tally.indexed
    )
}
