//! Integration tests for the fmbatch library
//!
//! These tests drive whole trees of markdown files through the batch and
//! copy drivers and check what ends up on disk.

use fmbatch::*;
use pretty_assertions::assert_eq;
use regex::Regex;
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

fn tags_request() -> TransformRequest {
    TransformRequest {
        unique_values: true,
        sort_arrays: true,
        ..TransformRequest::with_mode(Mode::ToArray, ["tags"])
    }
}

fn run(root: &Path, walk: &WalkOptions, request: &TransformRequest, dry_run: bool) -> RunStats {
    let options = UpdateOptions {
        dry_run,
        ..Default::default()
    };
    process_directory(root, walk, request, &options, |_| {})
}

fn sample_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.md", "---\ntitle: A\ntags: rust, go, rust\n---\n# A\n");
    write(root, "sub/b.md", "---\ntags: [zeta, alpha]\n---\nB body\n\n");
    write(root, "notes.txt", "---\ntags: x, y\n---\n");
    temp_dir
}

#[test]
fn test_tags_conversion_across_tree() {
    let temp_dir = sample_tree();
    let root = temp_dir.path();

    let stats = run(root, &WalkOptions::default(), &tags_request(), false);

    assert_eq!(stats.files_scanned, 2);
    assert_eq!(stats.files_modified, 2);
    assert_eq!(stats.changes.get("convert-to-array"), Some(&2));
    assert_eq!(
        read(root, "a.md"),
        "---\ntitle: A\ntags:\n- go\n- rust\n---\n# A\n"
    );
    assert_eq!(
        read(root, "sub/b.md"),
        "---\ntags:\n- alpha\n- zeta\n---\nB body\n\n"
    );
    assert_eq!(read(root, "notes.txt"), "---\ntags: x, y\n---\n");

    // Converting again finds nothing to do
    let again = run(root, &WalkOptions::default(), &tags_request(), false);
    assert_eq!(again.files_modified, 0);
    assert_eq!(again.files_unchanged, 2);
}

#[test]
fn test_walk_filters() {
    let temp_dir = sample_tree();
    let root = temp_dir.path();

    let shallow = WalkOptions {
        recursive: false,
        ..Default::default()
    };
    let stats = run(root, &shallow, &tags_request(), false);
    assert_eq!(stats.files_modified, 1);
    assert_eq!(read(root, "sub/b.md"), "---\ntags: [zeta, alpha]\n---\nB body\n\n");

    let by_name = WalkOptions {
        pattern: Some(Regex::new("^b").unwrap()),
        ..Default::default()
    };
    let stats = run(root, &by_name, &tags_request(), false);
    assert_eq!(stats.files_scanned, 1);
    assert_eq!(stats.files_modified, 1);
}

#[test]
fn test_dry_run_matches_real_run() {
    let temp_dir = sample_tree();
    let root = temp_dir.path();
    let before_a = read(root, "a.md");
    let before_b = read(root, "sub/b.md");

    let preview = run(root, &WalkOptions::default(), &tags_request(), true);
    assert_eq!(read(root, "a.md"), before_a);
    assert_eq!(read(root, "sub/b.md"), before_b);

    let real = run(root, &WalkOptions::default(), &tags_request(), false);
    assert_eq!(preview, real);
}

#[test]
fn test_delimiter_round_trip_through_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "post.md", "---\ncategories: web; rust; cli\n---\nbody\n");

    let to_array = TransformRequest {
        delimiter: ";".to_string(),
        ..TransformRequest::with_mode(Mode::ToArray, ["categories"])
    };
    let to_string = TransformRequest {
        delimiter: ";".to_string(),
        ..TransformRequest::with_mode(Mode::ToString, ["categories"])
    };

    run(root, &WalkOptions::default(), &to_array, false);
    assert_eq!(
        read(root, "post.md"),
        "---\ncategories:\n- web\n- rust\n- cli\n---\nbody\n"
    );

    run(root, &WalkOptions::default(), &to_string, false);
    let doc = parse(&read(root, "post.md")).unwrap();
    assert_eq!(
        doc.metadata.get("categories"),
        Some(&Value::from("web;rust;cli"))
    );
    assert_eq!(doc.body, "body\n");
}

#[test]
fn test_field_operations_keep_body_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let body = "intro\n---\nmore\n\n\n";
    write(
        root,
        "post.md",
        &format!("---\ntitle: T\nlegacy: x\ncat: news\n---\n{body}"),
    );

    let request = TransformRequest {
        add_field: Some(("draft".to_string(), Value::Bool(true))),
        remove_field: Some("legacy".to_string()),
        rename_field: Some(("cat".to_string(), "category".to_string())),
        ..Default::default()
    };
    let stats = run(root, &WalkOptions::default(), &request, false);

    assert_eq!(stats.files_modified, 1);
    assert_eq!(
        read(root, "post.md"),
        format!("---\ntitle: T\ncategory: news\ndraft: true\n---\n{body}")
    );
}

#[test]
fn test_json_front_matter() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "post.md",
        "---json\n{\"title\": \"A\", \"tags\": \"x,y\"}\n---\nbody",
    );

    let options = UpdateOptions {
        output_format: OutputFormat::Json,
        ..Default::default()
    };
    let request = TransformRequest::with_mode(Mode::ToArray, ["tags"]);
    process_directory(root, &WalkOptions::default(), &request, &options, |_| {});

    assert_eq!(
        read(root, "post.md"),
        "---\n{\n  \"title\": \"A\",\n  \"tags\": [\n    \"x\",\n    \"y\"\n  ]\n}\n---\nbody"
    );
}

#[test]
fn test_analyze_and_validate() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.md", "---\ntitle: A\ndate: 1\n---\n");
    write(root, "b.md", "---\ntitle: B\n---\n");
    write(root, "c.md", "no front matter\n");

    let mut analyzed = Vec::new();
    let stats = process_directory(
        root,
        &WalkOptions::default(),
        &TransformRequest::with_mode(Mode::Analyze, ["title"]),
        &UpdateOptions::default(),
        |report| analyzed.push(report.outcome.clone()),
    );
    assert_eq!(stats.files_scanned, 3);
    assert_eq!(stats.files_modified, 0);
    assert_eq!(stats.top_fields(), vec![("title", 2), ("date", 1)]);
    assert_eq!(
        analyzed[0],
        Outcome::Analyzed {
            fields: vec!["title".to_string(), "date".to_string()],
            values: vec![("title".to_string(), Value::from("A"))],
        }
    );

    let mut statuses = Vec::new();
    let stats = process_directory(
        root,
        &WalkOptions::default(),
        &TransformRequest::with_mode(Mode::Validate, ["title", "date"]),
        &UpdateOptions::default(),
        |report| statuses.push(report.status()),
    );
    assert_eq!(
        statuses,
        vec![FileStatus::Valid, FileStatus::Invalid, FileStatus::Invalid]
    );
    assert_eq!(stats.validation_failures, 2);
    assert_eq!(read(root, "c.md"), "no front matter\n");
}

#[test]
fn test_copy_front_matter_between_trees() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("en");
    let target = temp_dir.path().join("fr");
    write(&source, "guide/intro.md", "---\ntitle: A\nweight: 1\n---\nHello\n");
    write(&source, "about.md", "---\ntitle: About\n---\n");
    write(&target, "guide/intro.md", "---\ntitle: B\ndraft: true\n---\nBonjour\n");
    write(&target, "contact.md", "---\ntitle: Contact\n---\n");

    let fields = vec!["title".to_string()];
    let summary = copy(
        &source,
        &target,
        Some(fields.as_slice()),
        &CopyOptions::default(),
    );

    assert_eq!(summary.matched, 1);
    assert_eq!(summary.modified, 1);
    assert_eq!(summary.unmatched, 1);
    assert_eq!(
        read(&target, "guide/intro.md"),
        "---\ntitle: A\ndraft: true\n---\nBonjour\n"
    );
    assert_eq!(read(&target, "contact.md"), "---\ntitle: Contact\n---\n");
}
