//! Copy front matter fields from one tree of markdown files into another
//!
//! Targets are paired with sources by identical path relative to their roots,
//! falling back to an identical file name. The fallback only applies when a
//! single source file carries that name; ambiguous names are reported and the
//! target is left alone.

use crate::core::transform::{ChangeKind, ChangeRecord};
use crate::core::{document, Metadata};
use crate::error::Result;
use crate::io::updater::{self, UpdateOptions};
use crate::io::walker::{self, WalkOptions};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Options for one copy run
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// Filters used for both trees
    pub walk: WalkOptions,
    pub update: UpdateOptions,
}

/// How a target found its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMatch<'a> {
    RelativePath(&'a Path),
    Basename(&'a Path),
    /// Several sources share the target's file name
    Ambiguous(usize),
    NotFound,
}

/// Source files indexed by relative path and by file name
#[derive(Debug, Default)]
pub struct SourceIndex {
    by_relative: HashMap<PathBuf, PathBuf>,
    by_basename: HashMap<OsString, Vec<PathBuf>>,
}

impl SourceIndex {
    /// Walk `root` and index every matching file
    pub fn build(root: &Path, options: &WalkOptions) -> Self {
        let mut index = Self::default();
        walker::walk(root, options, |path| index.insert(root, path));
        debug!(
            "Indexed {} source files under {}",
            index.len(),
            root.display()
        );
        index
    }

    fn insert(&mut self, root: &Path, path: &Path) {
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        if let Some(name) = path.file_name() {
            self.by_basename
                .entry(name.to_os_string())
                .or_default()
                .push(path.to_path_buf());
        }
        self.by_relative.insert(relative, path.to_path_buf());
    }

    pub fn len(&self) -> usize {
        self.by_relative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_relative.is_empty()
    }

    /// Find the source for a target path given relative to the target root
    pub fn lookup(&self, relative: &Path) -> SourceMatch<'_> {
        if let Some(source) = self.by_relative.get(relative) {
            return SourceMatch::RelativePath(source);
        }

        let candidates = relative
            .file_name()
            .and_then(|name| self.by_basename.get(name));
        match candidates.map(Vec::as_slice) {
            Some([single]) => SourceMatch::Basename(single),
            Some(many) if many.len() > 1 => SourceMatch::Ambiguous(many.len()),
            _ => SourceMatch::NotFound,
        }
    }
}

/// Outcome for one paired target
#[derive(Debug, Clone)]
pub struct CopyReport {
    pub target: PathBuf,
    pub source: PathBuf,
    pub modified: bool,
    pub changes: Vec<ChangeRecord>,
    /// Line diff of the would-be write, only for dry runs
    pub diff: Option<String>,
}

/// Run-level result of [`copy`]
#[derive(Debug, Clone, Default)]
pub struct CopySummary {
    /// Targets paired with a source
    pub matched: usize,
    /// Targets that received at least one field
    pub modified: usize,
    pub unmatched: usize,
    pub ambiguous: usize,
    /// Targets skipped on read, parse or write errors
    pub failed: usize,
    pub reports: Vec<CopyReport>,
}

/// Copy `fields` (or every source field) from files under `source_root`
/// into their counterparts under `target_root`
pub fn copy(
    source_root: &Path,
    target_root: &Path,
    fields: Option<&[String]>,
    options: &CopyOptions,
) -> CopySummary {
    let index = SourceIndex::build(source_root, &options.walk);
    let mut sources: HashMap<PathBuf, Metadata> = HashMap::new();
    let mut summary = CopySummary::default();

    walker::walk(target_root, &options.walk, |target| {
        let relative = target.strip_prefix(target_root).unwrap_or(target);
        let source = match index.lookup(relative) {
            SourceMatch::RelativePath(source) | SourceMatch::Basename(source) => source,
            SourceMatch::Ambiguous(count) => {
                warn!(
                    "Skipping {}: {} source files share its name",
                    target.display(),
                    count
                );
                summary.ambiguous += 1;
                return;
            }
            SourceMatch::NotFound => {
                debug!("No source for {}", target.display());
                summary.unmatched += 1;
                return;
            }
        };
        summary.matched += 1;

        if !sources.contains_key(source) {
            match updater::read_document(source) {
                Ok(doc) => {
                    sources.insert(source.to_path_buf(), doc.metadata);
                }
                Err(err) => {
                    warn!("Skipping {}: cannot read source: {}", target.display(), err);
                    summary.failed += 1;
                    return;
                }
            }
        }
        let source_metadata = &sources[source];

        match copy_into(target, source, source_metadata, fields, &options.update) {
            Ok(report) => {
                if report.modified {
                    summary.modified += 1;
                }
                summary.reports.push(report);
            }
            Err(err) => {
                warn!("Skipping {}: {}", target.display(), err);
                summary.failed += 1;
            }
        }
    });

    debug!(
        "Matched {} target files, modified {}",
        summary.matched, summary.modified
    );
    summary
}

/// Fields to copy: the filter when given, otherwise every source field
fn selected_fields(source: &Metadata, fields: Option<&[String]>) -> Vec<String> {
    match fields {
        Some(filter) => filter.to_vec(),
        None => document::field_names(source),
    }
}

/// Copy fields into one target. Values present in the source overwrite the target's.
fn copy_into(
    target: &Path,
    source_path: &Path,
    source: &Metadata,
    fields: Option<&[String]>,
    options: &UpdateOptions,
) -> Result<CopyReport> {
    let original = std::fs::read_to_string(target)?;
    let mut doc = crate::io::codec::parse(&original).map_err(|e| e.with_path(target))?;

    let mut changes = Vec::new();
    for name in selected_fields(source, fields) {
        let Some(value) = document::get_field(source, &name) else {
            continue;
        };
        let old = document::set_field(&mut doc.metadata, &name, value.clone());
        changes.push(ChangeRecord::new(
            ChangeKind::CopyField,
            name,
            old,
            Some(value.clone()),
        ));
    }

    let modified = !changes.is_empty();
    let diff = if modified {
        let diff = updater::write_document(target, &original, &doc, options)?;
        info!("Copied {} fields into {}", changes.len(), target.display());
        diff
    } else {
        None
    };

    Ok(CopyReport {
        target: target.to_path_buf(),
        source: source_path.to_path_buf(),
        modified,
        changes,
        diff,
    })
}
