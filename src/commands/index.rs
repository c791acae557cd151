//! Index command handler - one timed pass plus index statistics

use std::sync::Arc;

use serde::Serialize;

use crate::cli::{IndexArgs, OutputFormat};
use crate::commands::{to_json, CommandContext};
use crate::error::Result;
use crate::index::{VariableIndex, VariableLocation};
use crate::indexing::{IndexRunner, SequentialRunner, WorkerPoolRunner};
use crate::metrics::{MetricsCollector, RunResult};
use crate::task::IndexingTask;

#[derive(Debug, Serialize)]
struct IndexSummary {
    discovered: usize,
    #[serde(flatten)]
    run: RunResult,
    indexed_files: usize,
    variables: usize,
    distinct_names: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    lookup: Option<Lookup>,
}

#[derive(Debug, Serialize)]
struct Lookup {
    name: String,
    locations: Vec<VariableLocation>,
}

/// Run the index command
pub fn run_index(args: &IndexArgs, ctx: &CommandContext) -> Result<String> {
    let discoverer = ctx.discoverer(&args.discovery)?;
    let files = discoverer.discover(&ctx.resolve_roots(&args.roots));

    let index = Arc::new(VariableIndex::new());
    let task = IndexingTask::new(Arc::clone(&index));

    let run = if args.jobs == 0 {
        MetricsCollector::measure(&SequentialRunner::new(&task), &files)?
    } else {
        let runner = WorkerPoolRunner::new(&task, args.jobs)?;
        tracing::info!("Indexing {} files with {} workers", files.len(), runner.worker_count());
        MetricsCollector::measure(&runner, &files)?
    };

    let summary = IndexSummary {
        discovered: files.len(),
        run,
        indexed_files: index.file_count(),
        variables: index.variable_count(),
        distinct_names: index.name_count(),
        lookup: args.lookup.as_ref().map(|name| Lookup {
            name: name.clone(),
            locations: index.lookup(name),
        }),
    };

    match ctx.format {
        OutputFormat::Text => Ok(render_text(&summary, ctx.verbose)),
        OutputFormat::Json => to_json(&summary),
    }
}

fn render_text(summary: &IndexSummary, verbose: bool) -> String {
    let mode = match summary.run.worker_count {
        0 => "sequential".to_string(),
        n => format!("{} workers", n),
    };

    let mut output = String::new();
    output.push_str(&format!(
        "Indexed {} of {} files ({}) in {:.3}s\n",
        summary.indexed_files,
        summary.discovered,
        mode,
        summary.run.elapsed_secs()
    ));
    output.push_str(&format!(
        "  variables: {}  distinct names: {}\n",
        summary.variables, summary.distinct_names
    ));

    let tally = &summary.run.tally;
    if tally.discarded() > 0 || verbose {
        output.push_str(&format!(
            "  discarded: {} (missing {}, unsupported {}, unreadable {}, parse {}, visit {}, panicked {})\n",
            tally.discarded(),
            tally.missing,
            tally.unsupported,
            tally.unreadable,
            tally.parse_failed,
            tally.visit_failed,
            tally.panicked
        ));
    }

    if let Some(lookup) = &summary.lookup {
        output.push_str(&format!("\n{}: {} locations\n", lookup.name, lookup.locations.len()));
        for loc in &lookup.locations {
            output.push_str(&format!(
                "  {}:{}:{} ({})\n",
                loc.file.display(),
                loc.line,
                loc.column,
                loc.lang.name()
            ));
        }
    }

    output
}
