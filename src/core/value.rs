//! Value classification for front matter fields
//!
//! Field values are plain `serde_yaml::Value`s. Transforms never look at them
//! directly; they dispatch on [`ValueKind`] and only act on the kinds they
//! declare support for, so every other kind passes through untouched.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;

/// The tagged variant a field value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Sequence,
    Mapping,
    Null,
}

impl ValueKind {
    /// Classify a value. Tagged YAML values are classified by their inner value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Sequence(_) => Self::Sequence,
            Value::Mapping(_) => Self::Mapping,
            Value::Null => Self::Null,
            Value::Tagged(tagged) => Self::of(&tagged.value),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

/// The value underneath any YAML tags
pub fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

/// Render a value as the text used when joining or sorting sequence elements.
///
/// Scalars render bare, null renders empty, collections render as compact JSON.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

/// Parse a command-line value, detecting integers, floats and booleans.
///
/// Anything else, including `inf` and `nan`, stays a string.
pub fn parse_cli_value(raw: &str) -> Value {
    let trimmed = raw.trim();

    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return Value::Number(serde_yaml::Number::from(f));
        }
    }
    match trimmed {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

/// A short single-line preview of a value for console reports
pub fn preview(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        Value::Sequence(_) | Value::Mapping(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| "<unprintable>".to_string())
        }
        Value::Null => "null".to_string(),
        other => scalar_text(other),
    }
}
