//! Filesystem side: the codec, the directory walker, the per-file update
//! orchestrator and the cross-directory copier.

pub mod codec;
pub mod copier;
pub mod updater;
pub mod walker;

pub use codec::{parse, stringify, OutputFormat};
pub use copier::{copy, CopyOptions, CopySummary};
pub use updater::{process_directory, update, FileStatus, Report, UpdateOptions};
pub use walker::{walk, WalkOptions, WalkSummary};
