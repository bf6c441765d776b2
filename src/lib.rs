//! fmbatch: batch editing of YAML/JSON front matter in markdown trees
//!
//! The library walks a directory, parses each markdown file's front matter,
//! applies field-level transforms, and writes changed files back (or previews
//! them in a dry run). It also copies selected fields between two parallel
//! trees of documents.
//!
//! # Quick Start
//!
//! ## Converting a field across a tree
//!
//! ```rust,no_run
//! use fmbatch::{process_directory, Mode, TransformRequest, UpdateOptions, WalkOptions};
//! use std::path::Path;
//!
//! let request = TransformRequest {
//!     unique_values: true,
//!     sort_arrays: true,
//!     ..TransformRequest::with_mode(Mode::ToArray, ["tags"])
//! };
//! let stats = process_directory(
//!     Path::new("content/"),
//!     &WalkOptions::default(),
//!     &request,
//!     &UpdateOptions { dry_run: true, ..Default::default() },
//!     |report| println!("{}: {} changes", report.path.display(), report.changes().len()),
//! );
//! println!("{} files modified", stats.files_modified);
//! ```
//!
//! ## Transforming metadata in memory
//!
//! ```rust
//! use fmbatch::{apply, parse, Mode, TransformRequest};
//!
//! let doc = parse("---\ntags: \"go, rust,  rust\"\n---\nBody\n").unwrap();
//! let request = TransformRequest {
//!     unique_values: true,
//!     ..TransformRequest::with_mode(Mode::ToArray, ["tags"])
//! };
//! let result = apply(&doc.metadata, &request);
//! assert_eq!(result.outcome.changes().len(), 1);
//! ```
//!
//! # Architecture
//!
//! - [`core`]: document model, value kinds, the transform engine, run statistics
//! - [`io`]: codec, directory walker, per-file updater, cross-tree copier
//! - [`error`]: the library error type
//!
//! Per-file failures never abort a batch: the drivers log them and move on.

pub mod core;
pub mod error;
pub mod io;

// Public API exports
pub use crate::core::{
    apply, ChangeKind, ChangeRecord, Document, Metadata, Mode, Outcome, RunStats,
    TransformRequest, Transformed, ValueKind,
};
pub use crate::error::{FmBatchError, Result};
pub use crate::io::{
    copy, parse, process_directory, stringify, update, walk, CopyOptions, CopySummary,
    FileStatus, OutputFormat, Report, UpdateOptions, WalkOptions, WalkSummary,
};
