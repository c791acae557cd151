//! parindex CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use parindex::commands::{self, CommandContext};
use parindex::{BenchConfig, Cli, Commands};

fn main() -> ExitCode {
    match run() {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run() -> parindex::Result<String> {
    let cli = Cli::parse();
    let config = BenchConfig::load(cli.config.as_deref())?;
    init_tracing(&config.logging.level, cli.verbose);

    let ctx = CommandContext::new(cli.format, cli.verbose, config);
    match &cli.command {
        Commands::Bench(args) => commands::run_bench(args, &ctx),
        Commands::Index(args) => commands::run_index(args, &ctx),
        Commands::Files(args) => commands::run_files(args, &ctx),
    }
}

/// Logs go to stderr; RUST_LOG wins over the configured level
fn init_tracing(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parindex={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
