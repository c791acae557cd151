//! Files command handler - list the discovered file set

use crate::cli::{FilesArgs, OutputFormat};
use crate::commands::{to_json, CommandContext};
use crate::error::Result;

/// Run the files command
pub fn run_files(args: &FilesArgs, ctx: &CommandContext) -> Result<String> {
    let discoverer = ctx.discoverer(&args.discovery)?;
    let files = discoverer.discover(&ctx.resolve_roots(&args.roots));

    match ctx.format {
        OutputFormat::Text => {
            let mut output = String::new();
            for file in &files {
                output.push_str(&format!("{}\n", file));
            }
            if ctx.verbose {
                output.push_str(&format!("\n{} files\n", files.len()));
            }
            Ok(output)
        }
        OutputFormat::Json => {
            let paths: Vec<String> = files.iter().map(|f| f.to_string()).collect();
            to_json(&serde_json::json!({
                "count": files.len(),
                "files": paths,
            }))
        }
    }
}
