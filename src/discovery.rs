//! File-set discovery
//!
//! Walks one or more roots with `ignore`'s walker and returns a deduplicated,
//! deterministic list of [`FileReference`]s. Identity is the canonical path,
//! so `src/a.rs`, `./src/../src/a.rs` and a symlink pointing at it collapse to
//! one entry. Nothing that goes wrong for a single entry aborts the walk.

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use ahash::AHashSet;
use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};
use crate::lang::Lang;

/// Directories that never contain first-party sources
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "dist",
    "build",
    "vendor",
    "coverage",
    "__pycache__",
];

/// Handle to one file to index. Equality is the resolved path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileReference {
    path: PathBuf,
}

impl FileReference {
    /// Wrap a path that is already resolved.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Canonicalize `path` and wrap it.
    pub fn resolve(path: &Path) -> io::Result<Self> {
        let canonical = path.canonicalize()?;
        Ok(Self::new(normalize_path(&canonical)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Strip the `\\?\` prefix Windows adds to canonicalized paths.
fn normalize_path(path: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        let s = path.to_string_lossy();
        if let Some(stripped) = s.strip_prefix(r"\\?\UNC\") {
            return PathBuf::from(format!(r"\\{}", stripped));
        }
        if let Some(stripped) = s.strip_prefix(r"\\?\") {
            return PathBuf::from(stripped);
        }
    }
    path.to_path_buf()
}

/// Options controlling what discovery yields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryOptions {
    /// Maximum directory depth below each root
    pub max_depth: usize,
    /// Extensions to include (empty = every supported language)
    pub extensions: Vec<String>,
    /// Include-only globs relative to each root; `!glob` excludes
    pub globs: Vec<String>,
    /// Walk hidden files and directories
    pub hidden: bool,
    /// Honour .gitignore / .ignore files
    pub respect_ignore: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_depth: 32,
            extensions: Vec::new(),
            globs: Vec::new(),
            hidden: false,
            respect_ignore: true,
        }
    }
}

/// Enumerates candidate files under a set of roots
#[derive(Debug, Clone)]
pub struct FileSetDiscoverer {
    options: DiscoveryOptions,
    extensions: Vec<String>,
}

impl FileSetDiscoverer {
    /// Build a discoverer, validating glob patterns up front.
    pub fn new(options: DiscoveryOptions) -> Result<Self> {
        build_overrides(Path::new("."), &options.globs)?;

        let extensions = options
            .extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Ok(Self {
            options,
            extensions,
        })
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Walk every root in order and return the deduplicated file set.
    pub fn discover(&self, roots: &[PathBuf]) -> Vec<FileReference> {
        let mut seen: AHashSet<PathBuf> = AHashSet::new();
        let mut files = Vec::new();

        for root in roots {
            let walker = match self.build_walker(root) {
                Ok(w) => w,
                Err(e) => {
                    tracing::debug!("Skipping root {}: {}", root.display(), e);
                    continue;
                }
            };

            for entry in walker {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::debug!("Walk error under {}: {}", root.display(), e);
                        continue;
                    }
                };

                let is_file = entry.file_type().is_some_and(|ft| {
                    ft.is_file() || (ft.is_symlink() && entry.path().is_file())
                });
                if !is_file || !self.accepts(entry.path()) {
                    continue;
                }

                match FileReference::resolve(entry.path()) {
                    Ok(file) => {
                        if seen.insert(file.path().to_path_buf()) {
                            files.push(file);
                        }
                    }
                    Err(e) => {
                        tracing::debug!("Cannot resolve {}: {}", entry.path().display(), e);
                    }
                }
            }
        }

        tracing::debug!("Discovered {} files under {} roots", files.len(), roots.len());
        files
    }

    fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        if self.extensions.is_empty() {
            Lang::from_extension(ext).is_ok()
        } else {
            let ext = ext.to_lowercase();
            self.extensions.iter().any(|e| *e == ext)
        }
    }

    fn build_walker(&self, root: &Path) -> Result<ignore::Walk> {
        let mut builder = WalkBuilder::new(root);

        let respect = self.options.respect_ignore;
        builder
            .git_ignore(respect)
            .git_global(respect)
            .git_exclude(respect)
            .ignore(respect)
            .parents(respect)
            .require_git(false)
            .hidden(!self.options.hidden)
            .follow_links(false)
            .max_depth(Some(self.options.max_depth))
            .sort_by_file_name(|a: &OsStr, b: &OsStr| a.cmp(b))
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                entry.depth() == 0
                    || !is_dir
                    || !entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| SKIPPED_DIRS.contains(&name))
            });

        if !self.options.globs.is_empty() {
            builder.overrides(build_overrides(root, &self.options.globs)?);
        }

        Ok(builder.build())
    }
}

fn build_overrides(root: &Path, globs: &[String]) -> Result<Override> {
    let mut builder = OverrideBuilder::new(root);
    for glob in globs {
        builder.add(glob).map_err(|e| BenchError::InvalidGlob {
            pattern: glob.clone(),
            message: e.to_string(),
        })?;
    }
    builder.build().map_err(|e| BenchError::InvalidGlob {
        pattern: globs.join(", "),
        message: e.to_string(),
    })
}
