//! The unit of indexing work: one file in, observations into the shared index.
//!
//! [`IndexingTask::process`] is a failure boundary. Whatever happens to one
//! file (it vanished, it is not UTF-8, the parser or visitor errored or
//! panicked) is converted into a [`FileOutcome::Discarded`] and the caller
//! moves on to the next file. Nothing is retried and nothing is propagated.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::discovery::FileReference;
use crate::index::VariableIndex;
use crate::lang::Lang;
use crate::parsing::{SourceParser, TreeSitterParser};
use crate::visitor::{Extractor, VariableExtractor};

/// Why a file contributed nothing to the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// Empty path, or the file no longer exists
    Missing,
    /// No parser for the file's extension
    Unsupported,
    /// Read failed (permissions, race-deleted, not UTF-8)
    Unreadable,
    /// Parser produced no tree
    ParseFailed,
    /// Visitor failed during traversal
    VisitFailed,
    /// A collaborator panicked
    Panicked,
}

/// Result of processing one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// File was committed to the index with this many variables
    Indexed { variables: usize },
    Discarded(DiscardReason),
}

/// Per-run counters folded from [`FileOutcome`]s
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTally {
    pub indexed: usize,
    pub variables: usize,
    pub missing: usize,
    pub unsupported: usize,
    pub unreadable: usize,
    pub parse_failed: usize,
    pub visit_failed: usize,
    pub panicked: usize,
    /// Workers that exited on a termination signal (0 for sequential runs)
    pub workers_exited: usize,
}

impl RunTally {
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Indexed { variables } => {
                self.indexed += 1;
                self.variables += variables;
            }
            FileOutcome::Discarded(reason) => match reason {
                DiscardReason::Missing => self.missing += 1,
                DiscardReason::Unsupported => self.unsupported += 1,
                DiscardReason::Unreadable => self.unreadable += 1,
                DiscardReason::ParseFailed => self.parse_failed += 1,
                DiscardReason::VisitFailed => self.visit_failed += 1,
                DiscardReason::Panicked => self.panicked += 1,
            },
        }
    }

    pub fn merge(&mut self, other: &RunTally) {
        self.indexed += other.indexed;
        self.variables += other.variables;
        self.missing += other.missing;
        self.unsupported += other.unsupported;
        self.unreadable += other.unreadable;
        self.parse_failed += other.parse_failed;
        self.visit_failed += other.visit_failed;
        self.panicked += other.panicked;
        self.workers_exited += other.workers_exited;
    }

    /// Files that were handed to the task but not indexed
    pub fn discarded(&self) -> usize {
        self.missing
            + self.unsupported
            + self.unreadable
            + self.parse_failed
            + self.visit_failed
            + self.panicked
    }

    /// Files handed to the task in total
    pub fn processed(&self) -> usize {
        self.indexed + self.discarded()
    }
}

/// Reads, parses and visits one file at a time.
///
/// The task holds shared handles only, so a single instance is borrowed by
/// every worker of a run.
#[derive(Clone)]
pub struct IndexingTask {
    index: Arc<VariableIndex>,
    parser: Arc<dyn SourceParser>,
    extractor: Arc<dyn Extractor>,
}

impl IndexingTask {
    /// Task using the tree-sitter parser and the variable visitor
    pub fn new(index: Arc<VariableIndex>) -> Self {
        Self::with_collaborators(index, Arc::new(TreeSitterParser), Arc::new(VariableExtractor))
    }

    pub fn with_collaborators(
        index: Arc<VariableIndex>,
        parser: Arc<dyn SourceParser>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        Self {
            index,
            parser,
            extractor,
        }
    }

    pub fn index(&self) -> &Arc<VariableIndex> {
        &self.index
    }

    /// Process one file. Never fails and never panics outward.
    pub fn process(&self, file: &FileReference) -> FileOutcome {
        match panic::catch_unwind(AssertUnwindSafe(|| self.try_process(file.path()))) {
            Ok(outcome) => outcome,
            Err(_) => FileOutcome::Discarded(DiscardReason::Panicked),
        }
    }

    fn try_process(&self, path: &Path) -> FileOutcome {
        if path.as_os_str().is_empty() || !path.exists() {
            return FileOutcome::Discarded(DiscardReason::Missing);
        }

        let Ok(lang) = Lang::from_path(path) else {
            return FileOutcome::Discarded(DiscardReason::Unsupported);
        };

        let Ok(source) = fs::read_to_string(path) else {
            return FileOutcome::Discarded(DiscardReason::Unreadable);
        };

        let Ok(tree) = self.parser.parse(lang, &source) else {
            return FileOutcome::Discarded(DiscardReason::ParseFailed);
        };

        match self
            .extractor
            .extract(path, lang, &source, &tree, &self.index)
        {
            Ok(variables) => FileOutcome::Indexed { variables },
            Err(_) => FileOutcome::Discarded(DiscardReason::VisitFailed),
        }
    }
}

impl std::fmt::Debug for IndexingTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexingTask")
            .field("indexed_files", &self.index.file_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BenchError, Result};
    use std::path::PathBuf;
    use tempfile::tempdir;
    use tree_sitter::Tree;

    struct FailingParser;

    impl SourceParser for FailingParser {
        fn parse(&self, _lang: Lang, _source: &str) -> Result<Tree> {
            Err(BenchError::ParseFailure {
                message: "no tree".to_string(),
            })
        }
    }

    struct PanickingExtractor;

    impl Extractor for PanickingExtractor {
        fn extract(
            &self,
            _file: &Path,
            _lang: Lang,
            _source: &str,
            _tree: &Tree,
            _index: &VariableIndex,
        ) -> anyhow::Result<usize> {
            panic!("visitor blew up");
        }
    }

    struct ErroringExtractor;

    impl Extractor for ErroringExtractor {
        fn extract(
            &self,
            _file: &Path,
            _lang: Lang,
            _source: &str,
            _tree: &Tree,
            _index: &VariableIndex,
        ) -> anyhow::Result<usize> {
            anyhow::bail!("traversal failed")
        }
    }

    fn write(dir: &Path, name: &str, content: &[u8]) -> FileReference {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        FileReference::resolve(&path).unwrap()
    }

    #[test]
    fn test_indexes_a_file() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "lib.rs", b"fn f() { let a = 1; let b = 2; }");
        let index = Arc::new(VariableIndex::new());
        let task = IndexingTask::new(Arc::clone(&index));

        assert_eq!(task.process(&file), FileOutcome::Indexed { variables: 2 });
        assert_eq!(index.indexed_files(), vec![file.path().to_path_buf()]);
    }

    #[test]
    fn test_missing_and_empty_paths_are_skipped() {
        let task = IndexingTask::new(Arc::new(VariableIndex::new()));
        let gone = FileReference::new(PathBuf::from("/definitely/not/here.rs"));
        let empty = FileReference::new(PathBuf::new());

        assert_eq!(task.process(&gone), FileOutcome::Discarded(DiscardReason::Missing));
        assert_eq!(task.process(&empty), FileOutcome::Discarded(DiscardReason::Missing));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "notes.txt", b"hello");
        let task = IndexingTask::new(Arc::new(VariableIndex::new()));
        assert_eq!(
            task.process(&file),
            FileOutcome::Discarded(DiscardReason::Unsupported)
        );
    }

    #[test]
    fn test_non_utf8_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "bad.py", &[0x78, 0x20, 0x3d, 0x20, 0xff, 0xfe]);
        let index = Arc::new(VariableIndex::new());
        let task = IndexingTask::new(Arc::clone(&index));

        assert_eq!(
            task.process(&file),
            FileOutcome::Discarded(DiscardReason::Unreadable)
        );
        assert_eq!(index.file_count(), 0);
    }

    #[test]
    fn test_parse_failure_is_absorbed() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "a.go", b"package a");
        let index = Arc::new(VariableIndex::new());
        let task = IndexingTask::with_collaborators(
            Arc::clone(&index),
            Arc::new(FailingParser),
            Arc::new(VariableExtractor),
        );

        assert_eq!(
            task.process(&file),
            FileOutcome::Discarded(DiscardReason::ParseFailed)
        );
        assert_eq!(index.file_count(), 0);
    }

    #[test]
    fn test_visitor_error_and_panic_are_absorbed() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "a.js", b"var a = 1;");
        let index = Arc::new(VariableIndex::new());

        let erroring = IndexingTask::with_collaborators(
            Arc::clone(&index),
            Arc::new(TreeSitterParser),
            Arc::new(ErroringExtractor),
        );
        assert_eq!(
            erroring.process(&file),
            FileOutcome::Discarded(DiscardReason::VisitFailed)
        );

        let panicking = IndexingTask::with_collaborators(
            Arc::clone(&index),
            Arc::new(TreeSitterParser),
            Arc::new(PanickingExtractor),
        );
        assert_eq!(
            panicking.process(&file),
            FileOutcome::Discarded(DiscardReason::Panicked)
        );
        assert_eq!(index.file_count(), 0);
    }

    #[test]
    fn test_tally_counts_by_reason() {
        let mut tally = RunTally::default();
        tally.record(FileOutcome::Indexed { variables: 3 });
        tally.record(FileOutcome::Indexed { variables: 0 });
        tally.record(FileOutcome::Discarded(DiscardReason::Missing));
        tally.record(FileOutcome::Discarded(DiscardReason::Panicked));

        let mut other = RunTally {
            workers_exited: 2,
            ..Default::default()
        };
        other.record(FileOutcome::Discarded(DiscardReason::ParseFailed));
        tally.merge(&other);

        assert_eq!(tally.indexed, 2);
        assert_eq!(tally.variables, 3);
        assert_eq!(tally.discarded(), 3);
        assert_eq!(tally.processed(), 5);
        assert_eq!(tally.workers_exited, 2);
    }
}
