//! Field transform engine
//!
//! [`apply`] computes a new metadata mapping from an old one and a
//! [`TransformRequest`]. It performs no I/O and never fails: absent fields and
//! values of an unsupported kind are skipped silently.
//!
//! Within one document the steps run in a fixed order, and the change log
//! follows the same order:
//!
//! 1. `to-array` / `to-string` for every requested field, in request order
//! 2. add field (only when absent)
//! 3. remove field
//! 4. rename field
//!
//! `analyze` and `validate` are read-only and end processing for the document.
//!
//! Conversions dispatch on [`ValueKind`], so a tagged string or sequence is
//! converted like an untagged one. The tag does not survive a conversion that
//! changes the value.

use crate::core::document::{self, Metadata};
use crate::core::value::{scalar_text, untagged, ValueKind};
use serde_yaml::Value;
use std::fmt;

/// What to do with the requested fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Split delimited strings into sequences
    ToArray,
    /// Join sequences into delimited strings
    ToString,
    /// Report which fields are present
    Analyze,
    /// Report which requested fields are missing
    Validate,
}

impl Mode {
    /// Read-only modes stop processing before any field operation runs
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Analyze | Self::Validate)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ToArray => "to-array",
            Self::ToString => "to-string",
            Self::Analyze => "analyze",
            Self::Validate => "validate",
        };
        f.write_str(name)
    }
}

/// Immutable description of the operations for one run
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    pub mode: Option<Mode>,
    pub fields: Vec<String>,
    pub delimiter: String,
    pub sort_arrays: bool,
    pub unique_values: bool,
    pub add_field: Option<(String, Value)>,
    pub remove_field: Option<String>,
    pub rename_field: Option<(String, String)>,
}

impl Default for TransformRequest {
    fn default() -> Self {
        Self {
            mode: None,
            fields: Vec::new(),
            delimiter: ",".to_string(),
            sort_arrays: false,
            unique_values: false,
            add_field: None,
            remove_field: None,
            rename_field: None,
        }
    }
}

impl TransformRequest {
    /// A request that only converts the given fields
    pub fn with_mode(mode: Mode, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            mode: Some(mode),
            fields: fields.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Whether this request can change a document at all
    pub fn is_mutating(&self) -> bool {
        match self.mode {
            Some(mode) if mode.is_terminal() => false,
            Some(_) => true,
            None => {
                self.add_field.is_some() || self.remove_field.is_some() || self.rename_field.is_some()
            }
        }
    }
}

/// Kind of a single recorded mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    ConvertToArray,
    ConvertToString,
    AddField,
    RemoveField,
    RenameField,
    CopyField,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ConvertToArray => "convert-to-array",
            Self::ConvertToString => "convert-to-string",
            Self::AddField => "add-field",
            Self::RemoveField => "remove-field",
            Self::RenameField => "rename-field",
            Self::CopyField => "copy-field",
        };
        f.write_str(name)
    }
}

/// One mutation applied to one document.
///
/// For renames `new_value` holds the new field name.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub field: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

impl ChangeRecord {
    pub fn new(
        kind: ChangeKind,
        field: impl Into<String>,
        old_value: Option<Value>,
        new_value: Option<Value>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            old_value,
            new_value,
        }
    }
}

/// What the engine found or did for one document
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Mutations applied; empty when nothing changed
    Changed(Vec<ChangeRecord>),
    /// Field names present, plus the requested fields' values
    Analyzed {
        fields: Vec<String>,
        values: Vec<(String, Value)>,
    },
    /// Requested fields absent from the document
    Validated { missing: Vec<String> },
}

impl Outcome {
    /// Recorded mutations, empty for read-only outcomes
    pub fn changes(&self) -> &[ChangeRecord] {
        match self {
            Self::Changed(changes) => changes,
            _ => &[],
        }
    }

    pub fn is_changed(&self) -> bool {
        !self.changes().is_empty()
    }
}

/// Result of [`apply`]: the new metadata and what happened
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub metadata: Metadata,
    pub outcome: Outcome,
}

/// Apply a request to a metadata mapping
pub fn apply(metadata: &Metadata, request: &TransformRequest) -> Transformed {
    match request.mode {
        Some(Mode::Analyze) => {
            return Transformed {
                metadata: metadata.clone(),
                outcome: analyze(metadata, &request.fields),
            }
        }
        Some(Mode::Validate) => {
            return Transformed {
                metadata: metadata.clone(),
                outcome: Outcome::Validated {
                    missing: missing_fields(metadata, &request.fields),
                },
            }
        }
        _ => {}
    }

    let mut updated = metadata.clone();
    let mut changes = Vec::new();

    match request.mode {
        Some(Mode::ToArray) => {
            for field in &request.fields {
                changes.extend(convert_to_array(&mut updated, field, request));
            }
        }
        Some(Mode::ToString) => {
            for field in &request.fields {
                changes.extend(convert_to_string(&mut updated, field, &request.delimiter));
            }
        }
        _ => {}
    }

    if let Some((name, value)) = &request.add_field {
        if !document::has_field(&updated, name) {
            document::set_field(&mut updated, name, value.clone());
            changes.push(ChangeRecord::new(
                ChangeKind::AddField,
                name.as_str(),
                None,
                Some(value.clone()),
            ));
        }
    }

    if let Some(name) = &request.remove_field {
        if let Some(old) = document::remove_field(&mut updated, name) {
            changes.push(ChangeRecord::new(
                ChangeKind::RemoveField,
                name.as_str(),
                Some(old),
                None,
            ));
        }
    }

    if let Some((from, to)) = &request.rename_field {
        if from != to {
            if let Some((moved, _)) = document::rename_field(&mut updated, from, to) {
                changes.push(ChangeRecord::new(
                    ChangeKind::RenameField,
                    from.as_str(),
                    Some(moved),
                    Some(Value::String(to.clone())),
                ));
            }
        }
    }

    Transformed {
        metadata: updated,
        outcome: Outcome::Changed(changes),
    }
}

fn analyze(metadata: &Metadata, requested: &[String]) -> Outcome {
    let values = requested
        .iter()
        .filter_map(|name| {
            document::get_field(metadata, name).map(|value| (name.clone(), value.clone()))
        })
        .collect();

    Outcome::Analyzed {
        fields: document::field_names(metadata),
        values,
    }
}

/// Requested fields that the metadata does not define
pub fn missing_fields(metadata: &Metadata, requested: &[String]) -> Vec<String> {
    requested
        .iter()
        .filter(|name| !document::has_field(metadata, name))
        .cloned()
        .collect()
}

fn convert_to_array(
    metadata: &mut Metadata,
    field: &str,
    request: &TransformRequest,
) -> Option<ChangeRecord> {
    let original = document::get_field(metadata, field)?.clone();
    let inner = untagged(&original);

    let mut items = match ValueKind::of(inner) {
        ValueKind::String => split_delimited(inner.as_str()?, &request.delimiter),
        ValueKind::Sequence => inner.as_sequence()?.clone(),
        _ => return None,
    };

    if request.unique_values {
        items = dedupe(items);
    }
    if request.sort_arrays {
        items.sort_by_cached_key(scalar_text);
    }

    let converted = Value::Sequence(items);
    if converted == *inner {
        return None;
    }

    document::set_field(metadata, field, converted.clone());
    Some(ChangeRecord::new(
        ChangeKind::ConvertToArray,
        field,
        Some(original),
        Some(converted),
    ))
}

fn convert_to_string(metadata: &mut Metadata, field: &str, delimiter: &str) -> Option<ChangeRecord> {
    let original = document::get_field(metadata, field)?.clone();
    let inner = untagged(&original);
    if ValueKind::of(inner) != ValueKind::Sequence {
        return None;
    }
    let seq = inner.as_sequence()?;

    let joined = Value::String(
        seq.iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join(delimiter),
    );

    document::set_field(metadata, field, joined.clone());
    Some(ChangeRecord::new(
        ChangeKind::ConvertToString,
        field,
        Some(original),
        Some(joined),
    ))
}

fn split_delimited(text: &str, delimiter: &str) -> Vec<Value> {
    if delimiter.is_empty() {
        let trimmed = text.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![Value::String(trimmed.to_string())]
        };
    }

    text.split(delimiter)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| Value::String(piece.to_string()))
        .collect()
}

fn dedupe(items: Vec<Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}
