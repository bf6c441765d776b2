//! Directory walking with extension and name-pattern filtering
//!
//! A directory that cannot be read is logged and its subtree abandoned; the
//! walk carries on with its siblings. Entries that are neither regular files
//! nor directories are skipped without comment.

use crate::error::FmBatchError;
use log::{debug, warn};
use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

/// Extensions matched when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &[".md", ".markdown"];

/// Filters applied while walking
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// File name suffixes to accept, each starting with a dot
    pub extensions: Vec<String>,
    /// Optional regex the file's basename must match
    pub pattern: Option<Regex>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            pattern: None,
        }
    }
}

impl WalkOptions {
    /// Replace the accepted extensions; `md` and `.md` are equivalent.
    /// An empty list restores the defaults.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: Vec<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty())
            .map(|e| if e.starts_with('.') { e } else { format!(".{e}") })
            .collect();

        if !normalized.is_empty() {
            self.extensions = normalized;
        }
        self
    }

    /// Whether a file name passes the extension and pattern filters
    pub fn matches(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
            && self
                .pattern
                .as_ref()
                .map_or(true, |re| re.is_match(file_name))
    }
}

/// What a walk saw
#[derive(Debug, Default)]
pub struct WalkSummary {
    /// Files handed to the visitor
    pub visited: usize,
    /// Directories that could not be enumerated
    pub errors: Vec<FmBatchError>,
}

/// Visit every matching file below `root`, in file-name order
pub fn walk<F>(root: &Path, options: &WalkOptions, mut visit: F) -> WalkSummary
where
    F: FnMut(&Path),
{
    let mut summary = WalkSummary::default();
    let max_depth = if options.recursive { usize::MAX } else { 1 };

    let walker = WalkDir::new(root)
        .follow_links(false)
        .max_depth(max_depth)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                warn!("Skipping {}: {}", path.display(), err);
                summary.errors.push(FmBatchError::walk(path, err.to_string()));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            debug!("Skipping non UTF-8 file name: {}", entry.path().display());
            continue;
        };

        if options.matches(name) {
            summary.visited += 1;
            visit(entry.path());
        }
    }

    summary
}
