//! Front matter codec: split a markdown file into metadata and body, and back
//!
//! A block opens with a `---` line, optionally tagged with its language
//! (`---yaml`, `---json`), and closes at the next `---` or `...` line. The body
//! is everything after the closing line, byte for byte, so
//! `parse(stringify(body, metadata))` gives back exactly what went in.

use crate::core::{Document, Metadata};
use crate::error::{FmBatchError, Result};
use serde_yaml::Value;
use std::fmt;

/// Opening and closing fence
pub const FENCE: &str = "---";

/// Alternative closing fence accepted when parsing
const END_OF_DOCUMENT: &str = "...";

/// Emission format for a rewritten front matter block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => f.write_str("yaml"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Parse file content into metadata and body.
///
/// Content without a leading fence yields empty metadata and the whole input
/// as body. Errors carry an empty path; callers attach theirs with
/// [`FmBatchError::with_path`].
pub fn parse(content: &str) -> Result<Document> {
    let Some((opening, rest)) = split_first_line(content) else {
        return Ok(Document::body_only(content));
    };
    let Some(language) = fence_language(opening) else {
        return Ok(Document::body_only(content));
    };

    let mut offset = 0;
    while offset < rest.len() {
        let (line, next) = match rest[offset..].find('\n') {
            Some(idx) => (&rest[offset..offset + idx], offset + idx + 1),
            None => (&rest[offset..], rest.len()),
        };
        let line = line.trim_end();
        if line == FENCE || line == END_OF_DOCUMENT {
            let metadata = decode_block(&rest[..offset], language)?;
            return Ok(Document::new(metadata, &rest[next..]));
        }
        offset = next;
    }

    Err(FmBatchError::invalid_front_matter(
        "",
        "front matter block is never closed",
    ))
}

/// Render metadata and body back into file content
pub fn stringify(body: &str, metadata: &Metadata, format: OutputFormat) -> Result<String> {
    let block = match format {
        OutputFormat::Yaml => serde_yaml::to_string(metadata)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(metadata)?;
            json.push('\n');
            json
        }
    };

    Ok(format!("{FENCE}\n{block}{FENCE}\n{body}"))
}

/// Convenience wrapper over [`stringify`] for a whole document
pub fn stringify_document(document: &Document, format: OutputFormat) -> Result<String> {
    stringify(&document.body, &document.metadata, format)
}

fn split_first_line(content: &str) -> Option<(&str, &str)> {
    content
        .split_once('\n')
        .map(|(line, rest)| (line.trim_end(), rest))
}

/// The language tag of an opening fence line, `Some("")` when untagged
fn fence_language(line: &str) -> Option<&str> {
    let tag = line.strip_prefix(FENCE)?;
    if tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(tag)
    } else {
        None
    }
}

fn decode_block(block: &str, language: &str) -> Result<Metadata> {
    if block.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let value: Value = match language.to_ascii_lowercase().as_str() {
        "json" => serde_json::from_str(block)?,
        "" if block.trim_start().starts_with('{') => match serde_json::from_str(block) {
            Ok(value) => value,
            // flow-style YAML also opens with a brace
            Err(_) => serde_yaml::from_str(block)?,
        },
        "" | "yaml" | "yml" => serde_yaml::from_str(block)?,
        other => {
            return Err(FmBatchError::invalid_front_matter(
                "",
                format!("unsupported front matter language '{other}'"),
            ))
        }
    };

    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Metadata::new()),
        other => Err(FmBatchError::invalid_front_matter(
            "",
            format!(
                "expected a mapping, found {}",
                crate::core::ValueKind::of(&other)
            ),
        )),
    }
}
