//! TestRepo builder for integration testing
//!
//! Builds throwaway source trees with a known number of variable bindings
//! per language, and runs the parindex binary against them.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Builder for temporary source trees
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new empty test repository
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Get the path to the test repository root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get path as string
    pub fn path_str(&self) -> String {
        self.dir.path().to_string_lossy().to_string()
    }

    /// Root as a one-element root list
    pub fn roots(&self) -> Vec<PathBuf> {
        vec![self.dir.path().to_path_buf()]
    }

    /// Add a source file with the given content
    pub fn add_file(&self, relative_path: &str, content: &str) -> &Self {
        self.add_bytes(relative_path, content.as_bytes())
    }

    /// Add a file with raw (possibly non-UTF-8) content
    pub fn add_bytes(&self, relative_path: &str, content: &[u8]) -> &Self {
        let full_path = self.dir.path().join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        self
    }

    /// Run the parindex binary from the repo root and return its output
    pub fn run_cli(&self, args: &[&str]) -> std::io::Result<Output> {
        Command::new(env!("CARGO_BIN_EXE_parindex"))
            .current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("PARINDEX_CONFIG")
            .args(args)
            .output()
    }

    /// Run CLI and expect success, return stdout
    pub fn run_cli_success(&self, args: &[&str]) -> String {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            output.status.success(),
            "CLI command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run CLI and expect failure, return (exit code, stderr)
    pub fn run_cli_failure(&self, args: &[&str]) -> (Option<i32>, String) {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            !output.status.success(),
            "CLI command {:?} should have failed",
            args
        );
        (
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        )
    }

    // ========================================================================
    // PRE-BUILT REPO STRUCTURES
    // ========================================================================

    /// One file per supported language family, 3 bindings each (18 total)
    pub fn with_multilang(&self) -> &Self {
        self.add_ts_vars("web/app.ts", "app", 3)
            .add_rs_vars("core/lib.rs", "core", 3)
            .add_py_vars("scripts/deploy.py", "deploy", 3)
            .add_go_vars("tools/main.go", "tool", 3)
            .add_java_vars("jvm/Main.java", "Main", 3)
            .add_c_vars("native/util.c", "util", 3)
    }

    /// `count` Python modules, `vars_per_file` bindings each
    pub fn with_many_files(&self, count: usize, vars_per_file: usize) -> &Self {
        for i in 0..count {
            self.add_py_vars(&format!("pkg/mod_{:04}.py", i), &format!("m{}", i), vars_per_file);
        }
        self
    }

    /// Files the task must discard without stopping the run
    pub fn with_broken_files(&self) -> &Self {
        self.add_bytes("broken/latin1.py", &[b'x', b'=', 0xe9, b'\n'])
            .add_bytes("broken/garbage.rs", &[0xff, 0xfe, 0x00, 0x01])
    }

    /// Directories discovery always skips
    pub fn with_vendored_dirs(&self) -> &Self {
        self.add_js_vars("node_modules/dep/index.js", "dep", 2)
            .add_rs_vars("target/debug/build.rs", "build", 2)
            .add_py_vars("__pycache__/cached.py", "cached", 2)
    }

    // ========================================================================
    // LANGUAGE BUILDERS
    // ========================================================================

    /// TypeScript file with `count` const bindings named `{prefix}_N`
    pub fn add_ts_vars(&self, relative_path: &str, prefix: &str, count: usize) -> &Self {
        let mut body = String::new();
        for i in 0..count {
            body.push_str(&format!("const {}_{}: number = {};\n", prefix, i, i));
        }
        self.add_file(relative_path, &body)
    }

    /// JavaScript file with `count` let bindings
    pub fn add_js_vars(&self, relative_path: &str, prefix: &str, count: usize) -> &Self {
        let mut body = String::new();
        for i in 0..count {
            body.push_str(&format!("let {}_{} = {};\n", prefix, i, i));
        }
        self.add_file(relative_path, &body)
    }

    /// Rust file with `count` let bindings inside one function
    pub fn add_rs_vars(&self, relative_path: &str, prefix: &str, count: usize) -> &Self {
        let mut body = String::from("fn main() {\n");
        for i in 0..count {
            body.push_str(&format!("    let {}_{} = {};\n", prefix, i, i));
        }
        body.push_str("}\n");
        self.add_file(relative_path, &body)
    }

    /// Python module with `count` assignments
    pub fn add_py_vars(&self, relative_path: &str, prefix: &str, count: usize) -> &Self {
        let mut body = String::new();
        for i in 0..count {
            body.push_str(&format!("{}_{} = {}\n", prefix, i, i));
        }
        self.add_file(relative_path, &body)
    }

    /// Go file with `count` short variable declarations
    pub fn add_go_vars(&self, relative_path: &str, prefix: &str, count: usize) -> &Self {
        let mut body = String::from("package main\n\nfunc main() {\n");
        for i in 0..count {
            body.push_str(&format!("\t{}_{} := {}\n", prefix, i, i));
        }
        body.push_str("}\n");
        self.add_file(relative_path, &body)
    }

    /// Java class with `count` locals in `main`
    pub fn add_java_vars(&self, relative_path: &str, class: &str, count: usize) -> &Self {
        let mut body = format!(
            "public class {} {{\n    public static void main(String[] args) {{\n",
            class
        );
        for i in 0..count {
            body.push_str(&format!("        int v_{} = {};\n", i, i));
        }
        body.push_str("    }\n}\n");
        self.add_file(relative_path, &body)
    }

    /// C file with `count` locals in one function
    pub fn add_c_vars(&self, relative_path: &str, prefix: &str, count: usize) -> &Self {
        let mut body = String::from("int main(void) {\n");
        for i in 0..count {
            body.push_str(&format!("    int {}_{} = {};\n", prefix, i, i));
        }
        body.push_str("    return 0;\n}\n");
        self.add_file(relative_path, &body)
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}
