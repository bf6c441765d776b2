//! Run-level counters printed by `--stats`

use crate::core::transform::{ChangeRecord, Outcome};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters accumulated over one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub files_scanned: usize,
    pub files_modified: usize,
    pub files_unchanged: usize,
    pub files_failed: usize,
    pub validation_failures: usize,
    pub directory_errors: usize,
    /// Number of change records per change kind
    pub changes: BTreeMap<String, usize>,
    /// Number of documents defining each field
    pub fields: BTreeMap<String, usize>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one successfully processed document
    pub fn record_outcome<'a>(
        &mut self,
        field_names: impl IntoIterator<Item = &'a String>,
        outcome: &Outcome,
    ) {
        self.files_scanned += 1;
        for name in field_names {
            *self.fields.entry(name.clone()).or_default() += 1;
        }

        match outcome {
            Outcome::Changed(changes) if !changes.is_empty() => {
                self.files_modified += 1;
                self.record_changes(changes);
            }
            Outcome::Validated { missing } if !missing.is_empty() => {
                self.files_unchanged += 1;
                self.validation_failures += 1;
            }
            _ => self.files_unchanged += 1,
        }
    }

    /// Account for a document that could not be processed
    pub fn record_failure(&mut self) {
        self.files_scanned += 1;
        self.files_failed += 1;
    }

    pub fn record_changes(&mut self, changes: &[ChangeRecord]) {
        for change in changes {
            *self.changes.entry(change.kind.to_string()).or_default() += 1;
        }
    }

    /// Fields ordered by how many documents define them, most common first
    pub fn top_fields(&self) -> Vec<(&str, usize)> {
        let mut fields: Vec<_> = self
            .fields
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        fields.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        fields
    }
}
