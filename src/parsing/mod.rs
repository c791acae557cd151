//! Parser boundary for the indexing task.
//!
//! The harness only needs "text in, syntax tree out". [`SourceParser`] is that
//! seam; [`TreeSitterParser`] is the default implementation used by the CLI.
//! Tests substitute their own parsers to inject failures.
//!
//! # Example
//!
//! ```ignore
//! use parindex::parsing::{SourceParser, TreeSitterParser};
//! use parindex::Lang;
//!
//! let tree = TreeSitterParser.parse(Lang::Rust, "fn main() { let x = 1; }")?;
//! assert_eq!(tree.root_node().kind(), "source_file");
//! ```

use tree_sitter::Tree;

use crate::error::{BenchError, Result};
use crate::lang::Lang;

/// Turns source text into a syntax tree.
///
/// Implementations are shared by every worker of a run, so they must be
/// `Send + Sync`. Returning `Err` means no tree was produced.
pub trait SourceParser: Send + Sync {
    fn parse(&self, lang: Lang, source: &str) -> Result<Tree>;
}

/// Tree-sitter backed parser.
///
/// `tree_sitter::Parser` is neither `Sync` nor cheap to share, so a fresh
/// parser is created per call. Tree-sitter is lenient: syntax errors produce
/// a tree with error nodes rather than a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterParser;

impl SourceParser for TreeSitterParser {
    fn parse(&self, lang: Lang, source: &str) -> Result<Tree> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&lang.tree_sitter_language())
            .map_err(|e| BenchError::ParseFailure {
                message: format!("Failed to set language {}: {:?}", lang.name(), e),
            })?;

        parser
            .parse(source, None)
            .ok_or_else(|| BenchError::ParseFailure {
                message: format!("Parser produced no tree for {} source", lang.name()),
            })
    }
}
