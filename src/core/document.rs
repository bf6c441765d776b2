//! Document model: a metadata mapping plus the markdown body it precedes
//!
//! The metadata keeps keys in insertion order so that a rewrite only moves
//! the fields an operation actually touched.

use serde_yaml::{Mapping, Value};

/// Ordered field mapping parsed from a front matter block
pub type Metadata = Mapping;

/// A markdown document split into metadata and body
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub metadata: Metadata,
    pub body: String,
}

impl Document {
    /// Create a new document from metadata and body
    pub fn new(metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            metadata,
            body: body.into(),
        }
    }

    /// Create a document with only body content
    pub fn body_only(body: impl Into<String>) -> Self {
        Self::new(Metadata::new(), body)
    }

    /// Whether any field is defined
    pub fn has_front_matter(&self) -> bool {
        !self.metadata.is_empty()
    }
}

/// Look up a top-level field by name
pub fn get_field<'a>(metadata: &'a Metadata, name: &str) -> Option<&'a Value> {
    metadata.get(name)
}

/// Whether a top-level field is present
pub fn has_field(metadata: &Metadata, name: &str) -> bool {
    metadata.contains_key(name)
}

/// Set a field, keeping its position when it already exists
pub fn set_field(metadata: &mut Metadata, name: &str, value: Value) -> Option<Value> {
    metadata.insert(Value::String(name.to_string()), value)
}

/// Remove a field, preserving the order of the remaining keys
pub fn remove_field(metadata: &mut Metadata, name: &str) -> Option<Value> {
    metadata.shift_remove(name)
}

/// Move the value at `from` to `to`.
///
/// When `to` already exists it takes the moved value in its own slot and `from`
/// disappears. Otherwise the key is renamed where it stands. Returns the moved
/// value and whatever `to` held before, or `None` when `from` is absent.
pub fn rename_field(
    metadata: &mut Metadata,
    from: &str,
    to: &str,
) -> Option<(Value, Option<Value>)> {
    if !has_field(metadata, from) {
        return None;
    }
    if from == to {
        let value = metadata.get(from).cloned()?;
        return Some((value.clone(), Some(value)));
    }

    if has_field(metadata, to) {
        let moved = remove_field(metadata, from)?;
        let previous = set_field(metadata, to, moved.clone());
        return Some((moved, previous));
    }

    let mut renamed = Metadata::with_capacity(metadata.len());
    let mut moved = None;
    for (key, value) in std::mem::take(metadata) {
        if key.as_str() == Some(from) {
            moved = Some(value.clone());
            renamed.insert(Value::String(to.to_string()), value);
        } else {
            renamed.insert(key, value);
        }
    }
    *metadata = renamed;
    moved.map(|value| (value, None))
}

/// Names of all string-keyed fields, in document order
pub fn field_names(metadata: &Metadata) -> Vec<String> {
    metadata
        .keys()
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect()
}
