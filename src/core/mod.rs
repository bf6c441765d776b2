//! Core types: the document model, value classification, the field transform
//! engine and run statistics. Nothing in here touches the filesystem.

pub mod document;
pub mod stats;
pub mod transform;
pub mod value;

pub use document::{Document, Metadata};
pub use stats::RunStats;
pub use transform::{
    apply, ChangeKind, ChangeRecord, Mode, Outcome, TransformRequest, Transformed,
};
pub use value::ValueKind;
