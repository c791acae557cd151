//! Custom assertions for integration tests

use std::collections::BTreeSet;
use std::path::PathBuf;

use parindex::VariableIndex;
use serde_json::Value;

/// Assert that output is valid JSON and return parsed value
pub fn assert_valid_json(output: &str, context: &str) -> Value {
    serde_json::from_str(output).unwrap_or_else(|e| {
        panic!(
            "Expected valid JSON ({}): {}\nOutput:\n{}",
            context, e, output
        )
    })
}

/// Snapshot of an index's file set, for comparing runs
pub fn indexed_set(index: &VariableIndex) -> BTreeSet<PathBuf> {
    index.indexed_files().into_iter().collect()
}

/// Assert the variable name is recorded exactly `expected` times
pub fn assert_lookup_count(index: &VariableIndex, name: &str, expected: usize) {
    let found = index.lookup(name).len();
    assert_eq!(
        found, expected,
        "Expected {} locations for '{}' but found {}",
        expected, name, found
    );
}
