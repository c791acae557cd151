//! Shared in-memory variable index
//!
//! One `VariableIndex` is created per harness and handed to every
//! [`IndexingTask`](crate::task::IndexingTask) through an `Arc`. Workers write
//! to it concurrently; all synchronization lives here behind a single
//! `parking_lot::RwLock`, so callers never lock around it.
//!
//! The harness only relies on [`VariableIndex::clear`] and
//! [`VariableIndex::accept`]. The read accessors exist for reporting and tests.

use std::path::{Path, PathBuf};

use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;
use serde::Serialize;

use crate::lang::Lang;

/// One variable binding seen in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableObservation {
    /// Bound identifier
    pub name: String,
    /// 1-based line of the identifier
    pub line: usize,
    /// 1-based column of the identifier
    pub column: usize,
    /// Syntax node kind that declared the binding (e.g. `let_declaration`)
    pub declaration: &'static str,
}

/// Where a variable was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableLocation {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub lang: Lang,
}

#[derive(Debug, Default)]
struct IndexState {
    by_name: AHashMap<String, Vec<VariableLocation>>,
    files: AHashSet<PathBuf>,
    variables: usize,
}

/// Thread-safe variable index shared by every worker of a run
#[derive(Debug, Default)]
pub struct VariableIndex {
    state: RwLock<IndexState>,
}

impl VariableIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything recorded so far. Idempotent.
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.by_name.clear();
        state.files.clear();
        state.variables = 0;
    }

    /// Commit one file's observations in a single write.
    ///
    /// The file counts as indexed even when it declared no variables.
    pub fn accept(&self, file: &Path, lang: Lang, observations: Vec<VariableObservation>) {
        let mut state = self.state.write();
        state.variables += observations.len();
        for obs in observations {
            state
                .by_name
                .entry(obs.name)
                .or_default()
                .push(VariableLocation {
                    file: file.to_path_buf(),
                    line: obs.line,
                    column: obs.column,
                    lang,
                });
        }
        state.files.insert(file.to_path_buf());
    }

    /// Number of files accepted since the last clear
    pub fn file_count(&self) -> usize {
        self.state.read().files.len()
    }

    /// Number of variable observations accepted since the last clear
    pub fn variable_count(&self) -> usize {
        self.state.read().variables
    }

    /// Number of distinct variable names
    pub fn name_count(&self) -> usize {
        self.state.read().by_name.len()
    }

    /// Indexed files, sorted
    pub fn indexed_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.state.read().files.iter().cloned().collect();
        files.sort();
        files
    }

    /// All recorded locations of a variable name
    pub fn lookup(&self, name: &str) -> Vec<VariableLocation> {
        self.state
            .read()
            .by_name
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn obs(name: &str, line: usize) -> VariableObservation {
        VariableObservation {
            name: name.to_string(),
            line,
            column: 1,
            declaration: "let_declaration",
        }
    }

    #[test]
    fn test_accept_and_lookup() {
        let index = VariableIndex::new();
        index.accept(
            Path::new("/repo/a.rs"),
            Lang::Rust,
            vec![obs("count", 1), obs("total", 2)],
        );
        index.accept(Path::new("/repo/b.rs"), Lang::Rust, vec![obs("count", 7)]);

        assert_eq!(index.file_count(), 2);
        assert_eq!(index.variable_count(), 3);
        assert_eq!(index.name_count(), 2);

        let count = index.lookup("count");
        assert_eq!(count.len(), 2);
        assert!(count.iter().any(|l| l.file == Path::new("/repo/b.rs") && l.line == 7));
        assert!(index.lookup("missing").is_empty());
    }

    #[test]
    fn test_file_without_variables_is_indexed() {
        let index = VariableIndex::new();
        index.accept(Path::new("/repo/empty.py"), Lang::Python, Vec::new());
        assert_eq!(index.file_count(), 1);
        assert_eq!(index.variable_count(), 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let index = VariableIndex::new();
        index.accept(Path::new("/repo/a.go"), Lang::Go, vec![obs("x", 1)]);
        index.clear();
        index.clear();
        assert_eq!(index.file_count(), 0);
        assert_eq!(index.variable_count(), 0);
        assert!(index.lookup("x").is_empty());
    }

    #[test]
    fn test_concurrent_writers() {
        let index = Arc::new(VariableIndex::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let index = Arc::clone(&index);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let path = PathBuf::from(format!("/repo/t{}/f{}.ts", t, i));
                        index.accept(&path, Lang::TypeScript, vec![obs("shared", i + 1)]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(index.file_count(), 400);
        assert_eq!(index.lookup("shared").len(), 400);
    }
}
