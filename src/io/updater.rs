//! Per-file read, transform and write back, with dry-run previews
//!
//! [`update`] handles one file and returns its errors. [`process_directory`]
//! is the batch driver: it walks a tree, updates every match, and turns any
//! per-file error into a logged skip so one bad file never ends the run.

use crate::core::transform::{self, ChangeRecord, Outcome, TransformRequest};
use crate::core::{document, Document, RunStats};
use crate::error::{FmBatchError, Result};
use crate::io::codec::{self, OutputFormat};
use crate::io::walker::{self, WalkOptions};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// How changed documents are written back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Compute and report everything, write nothing
    pub dry_run: bool,
    /// Emission format for rewritten front matter
    pub output_format: OutputFormat,
}

/// Coarse result of processing one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Modified,
    Unchanged,
    Analyzed,
    Valid,
    Invalid,
}

/// Result of processing one file
#[derive(Debug, Clone)]
pub struct Report {
    pub path: PathBuf,
    /// Whether the document changed (and was written, unless a dry run)
    pub modified: bool,
    pub dry_run: bool,
    pub outcome: Outcome,
    /// Fields the document defined before any change
    pub field_names: Vec<String>,
    /// Line diff of the would-be write, only for dry runs
    pub diff: Option<String>,
}

impl Report {
    pub fn changes(&self) -> &[ChangeRecord] {
        self.outcome.changes()
    }

    pub fn status(&self) -> FileStatus {
        match &self.outcome {
            Outcome::Analyzed { .. } => FileStatus::Analyzed,
            Outcome::Validated { missing } if missing.is_empty() => FileStatus::Valid,
            Outcome::Validated { .. } => FileStatus::Invalid,
            Outcome::Changed(_) if self.modified => FileStatus::Modified,
            Outcome::Changed(_) => FileStatus::Unchanged,
        }
    }
}

/// Read and parse a markdown file
pub fn read_document(path: &Path) -> Result<Document> {
    let content = read_to_string(path)?;
    codec::parse(&content).map_err(|e| e.with_path(path))
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FmBatchError::file_not_found(path),
        _ => FmBatchError::Io(e),
    })
}

/// Serialize a document and write it to `path` unless this is a dry run.
///
/// Returns a line diff against the current content for dry runs.
pub fn write_document(
    path: &Path,
    original: &str,
    document: &Document,
    options: &UpdateOptions,
) -> Result<Option<String>> {
    let new_content = codec::stringify_document(document, options.output_format)?;

    if options.dry_run {
        debug!("Dry run, not writing {}", path.display());
        return Ok(generate_diff(original, &new_content, path));
    }

    fs::write(path, new_content)?;
    Ok(None)
}

/// Apply a transform request to one file
pub fn update(path: &Path, request: &TransformRequest, options: &UpdateOptions) -> Result<Report> {
    debug!("Processing file: {}", path.display());

    let content = read_to_string(path)?;
    let parsed = codec::parse(&content).map_err(|e| e.with_path(path))?;
    let field_names = document::field_names(&parsed.metadata);

    let transformed = transform::apply(&parsed.metadata, request);
    let modified = transformed.outcome.is_changed();

    let mut diff = None;
    if modified {
        let updated = Document::new(transformed.metadata, parsed.body);
        diff = write_document(path, &content, &updated, options)?;
        if options.dry_run {
            info!("Would update: {}", path.display());
        } else {
            info!("Updated: {}", path.display());
        }
    }

    Ok(Report {
        path: path.to_path_buf(),
        modified,
        dry_run: options.dry_run,
        outcome: transformed.outcome,
        field_names,
        diff,
    })
}

/// Update every matching file below `root`.
///
/// Each successful report is handed to `on_report`; failures are logged with
/// their path and counted, and processing moves on to the next file.
pub fn process_directory<F>(
    root: &Path,
    walk_options: &WalkOptions,
    request: &TransformRequest,
    options: &UpdateOptions,
    mut on_report: F,
) -> RunStats
where
    F: FnMut(&Report),
{
    let mut stats = RunStats::new();

    let summary = walker::walk(root, walk_options, |path| {
        match update(path, request, options) {
            Ok(report) => {
                stats.record_outcome(&report.field_names, &report.outcome);
                on_report(&report);
            }
            Err(err) => {
                warn!("Skipping {}: {}", path.display(), err);
                stats.record_failure();
            }
        }
    });

    stats.directory_errors = summary.errors.len();
    info!(
        "Processed {} files, {} modified",
        stats.files_scanned, stats.files_modified
    );
    stats
}

/// Minimal unified-style diff: common prefix and suffix trimmed, one hunk
fn generate_diff(old_content: &str, new_content: &str, path: &Path) -> Option<String> {
    if old_content == new_content {
        return None;
    }

    let old_lines: Vec<&str> = old_content.lines().collect();
    let new_lines: Vec<&str> = new_content.lines().collect();

    let common_prefix = old_lines
        .iter()
        .zip(new_lines.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let old_rest = &old_lines[common_prefix..];
    let new_rest = &new_lines[common_prefix..];

    let common_suffix = old_rest
        .iter()
        .rev()
        .zip(new_rest.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_middle = &old_rest[..old_rest.len() - common_suffix];
    let new_middle = &new_rest[..new_rest.len() - common_suffix];

    if old_middle.is_empty() && new_middle.is_empty() {
        return None;
    }

    let mut diff_lines = vec![
        format!("--- {}", path.display()),
        format!("+++ {}", path.display()),
        format!(
            "@@ -{},{} +{},{} @@",
            common_prefix + 1,
            old_middle.len(),
            common_prefix + 1,
            new_middle.len()
        ),
    ];
    diff_lines.extend(old_middle.iter().map(|line| format!("-{line}")));
    diff_lines.extend(new_middle.iter().map(|line| format!("+{line}")));

    Some(diff_lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::{ChangeKind, Mode};
    use pretty_assertions::assert_eq;
    use serde_yaml::Value;
    use tempfile::TempDir;

    fn tags_request() -> TransformRequest {
        TransformRequest {
            unique_values: true,
            sort_arrays: true,
            ..TransformRequest::with_mode(Mode::ToArray, ["tags"])
        }
    }

    #[test]
    fn test_update_writes_changes() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("post.md");
        fs::write(&file_path, "---\ntitle: A\ntags: rust, go\n---\n# Body\n").unwrap();

        let report = update(&file_path, &tags_request(), &UpdateOptions::default()).unwrap();

        assert!(report.modified);
        assert_eq!(report.status(), FileStatus::Modified);
        assert_eq!(report.changes().len(), 1);
        assert!(report.diff.is_none());
        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            "---\ntitle: A\ntags:\n- go\n- rust\n---\n# Body\n"
        );
    }

    #[test]
    fn test_dry_run_never_writes() {
        let temp_dir = TempDir::new().unwrap();
        let dry_path = temp_dir.path().join("dry.md");
        let wet_path = temp_dir.path().join("wet.md");
        let content = "---\ntags: b, a, b\nold: 1\n---\nbody";
        fs::write(&dry_path, content).unwrap();
        fs::write(&wet_path, content).unwrap();

        let request = TransformRequest {
            rename_field: Some(("old".to_string(), "new".to_string())),
            ..tags_request()
        };
        let dry = update(
            &dry_path,
            &request,
            &UpdateOptions {
                dry_run: true,
                ..Default::default()
            },
        )
        .unwrap();
        let wet = update(&wet_path, &request, &UpdateOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(&dry_path).unwrap(), content);
        assert!(dry.modified);
        assert!(dry.dry_run);
        assert_eq!(dry.changes(), wet.changes());
        let diff = dry.diff.unwrap();
        assert!(diff.contains("-tags: b, a, b"));
        assert!(diff.contains("+new: 1"));
    }

    #[test]
    fn test_unchanged_file_is_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("post.md");
        // Unusual but valid formatting that a rewrite would normalize
        let content = "---\ntags:   [a,   b]\n---\nbody";
        fs::write(&file_path, content).unwrap();

        let report = update(&file_path, &tags_request(), &UpdateOptions::default()).unwrap();
        assert!(!report.modified);
        assert_eq!(report.status(), FileStatus::Unchanged);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), content);
    }

    #[test]
    fn test_add_field_to_file_without_front_matter() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("plain.md");
        fs::write(&file_path, "# Plain\n").unwrap();

        let request = TransformRequest {
            add_field: Some(("status".to_string(), Value::from("draft"))),
            ..Default::default()
        };
        let report = update(&file_path, &request, &UpdateOptions::default()).unwrap();

        assert_eq!(report.changes()[0].kind, ChangeKind::AddField);
        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            "---\nstatus: draft\n---\n# Plain\n"
        );
    }

    #[test]
    fn test_json_output_format() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("post.md");
        fs::write(&file_path, "---\ntitle: A\n---\nbody").unwrap();

        let request = TransformRequest {
            add_field: Some(("count".to_string(), Value::from(2))),
            ..Default::default()
        };
        let options = UpdateOptions {
            output_format: OutputFormat::Json,
            ..Default::default()
        };
        update(&file_path, &request, &options).unwrap();

        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            "---\n{\n  \"title\": \"A\",\n  \"count\": 2\n}\n---\nbody"
        );
        let reread = read_document(&file_path).unwrap();
        assert_eq!(reread.metadata.len(), 2);
    }

    #[test]
    fn test_validate_reports_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("post.md");
        fs::write(&file_path, "---\ntitle: A\n---\n").unwrap();

        let request = TransformRequest::with_mode(Mode::Validate, ["title", "date"]);
        let report = update(&file_path, &request, &UpdateOptions::default()).unwrap();

        assert!(!report.modified);
        assert_eq!(report.status(), FileStatus::Invalid);
        assert_eq!(
            report.outcome,
            Outcome::Validated {
                missing: vec!["date".to_string()]
            }
        );
    }

    #[test]
    fn test_update_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = update(
            &temp_dir.path().join("gone.md"),
            &tags_request(),
            &UpdateOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FmBatchError::FileNotFound { .. }));
    }

    #[test]
    fn test_bad_file_does_not_stop_the_batch() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.md"), "---\ntags: x, y\n---\n").unwrap();
        fs::write(root.join("b.md"), "---\ntags: [unclosed\n---\n").unwrap();
        fs::write(root.join("c.md"), "---\ntags: never closed\n").unwrap();
        fs::write(root.join("d.md"), "---\ntags: z\n---\n").unwrap();

        let mut seen = Vec::new();
        let stats = process_directory(
            root,
            &WalkOptions::default(),
            &tags_request(),
            &UpdateOptions::default(),
            |report| seen.push(report.path.file_name().unwrap().to_string_lossy().to_string()),
        );

        assert_eq!(seen, vec!["a.md", "d.md"]);
        assert_eq!(stats.files_scanned, 4);
        assert_eq!(stats.files_failed, 2);
        assert_eq!(stats.files_modified, 2);
        assert_eq!(
            fs::read_to_string(root.join("d.md")).unwrap(),
            "---\ntags:\n- z\n---\n"
        );
    }

    #[test]
    fn test_diff_generation() {
        let diff = generate_diff("line1\nline2\nline3", "line1\nmodified line2\nline3", Path::new("t.md"))
            .unwrap();
        assert!(diff.contains("@@ -2,1 +2,1 @@"));
        assert!(diff.contains("-line2"));
        assert!(diff.contains("+modified line2"));
        assert!(generate_diff("same", "same", Path::new("t.md")).is_none());
    }
}
