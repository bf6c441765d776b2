//! CLI command handlers that bridge CLI arguments to library operations
//!
//! Arguments are validated and turned into immutable library options once,
//! before any file is touched. Configuration problems surface as
//! [`FmBatchError::Config`] and end the process with a non-zero status.

use crate::cli_bin::args::Cli;
use anyhow::Result;
use fmbatch::core::value::{parse_cli_value, preview};
use fmbatch::error::FmBatchError;
use fmbatch::{
    copy, process_directory, ChangeRecord, CopyOptions, CopySummary, Mode, OutputFormat, Outcome,
    Report, RunStats, TransformRequest, UpdateOptions, WalkOptions,
};
use log::{debug, info, warn};
use regex::Regex;
use std::path::Path;

/// Execute the parsed command line
pub fn run(cli: Cli) -> Result<()> {
    debug!("Executing with args: {:?}", cli);

    let walk = walk_options(&cli)?;
    let update = update_options(&cli);

    if let Some(pair) = &cli.copy_frontmatter {
        let [source, target] = pair.as_slice() else {
            return Err(FmBatchError::config("--copy-frontmatter takes SRC and DST").into());
        };
        if cli.directory.is_some() {
            warn!("DIRECTORY is ignored when copying front matter");
        }
        let fields = cli.frontmatter_fields.as_deref().map(clean_list);
        if fields.as_ref().is_some_and(Vec::is_empty) {
            return Err(FmBatchError::config("--frontmatter-fields names no field").into());
        }
        let options = CopyOptions { walk, update };
        return copy_command(source, target, fields.as_deref(), &options, &cli);
    }

    let Some(root) = &cli.directory else {
        return Err(FmBatchError::config(
            "a DIRECTORY or --copy-frontmatter SRC DST is required",
        )
        .into());
    };
    let request = transform_request(&cli)?;
    batch_command(root, &walk, &request, &update, &cli)
}

/// Walk one tree and apply the transform request to every match
fn batch_command(
    root: &Path,
    walk: &WalkOptions,
    request: &TransformRequest,
    update: &UpdateOptions,
    cli: &Cli,
) -> Result<()> {
    info!("Processing {}", root.display());

    let stats = process_directory(root, walk, request, update, |report| {
        output_report(report, cli.verbose)
    });

    if request.mode == Some(Mode::Analyze) {
        output_field_usage(&stats);
    }
    if request.mode == Some(Mode::Validate) && stats.validation_failures > 0 {
        warn!("{} files are missing required fields", stats.validation_failures);
    }
    if cli.stats {
        output_stats(&stats, update.output_format)?;
    }
    Ok(())
}

/// Copy front matter between two trees and print the summary
fn copy_command(
    source: &Path,
    target: &Path,
    fields: Option<&[String]>,
    options: &CopyOptions,
    cli: &Cli,
) -> Result<()> {
    info!(
        "Copying front matter from {} to {}",
        source.display(),
        target.display()
    );

    let summary = copy(source, target, fields, options);

    for report in summary.reports.iter().filter(|r| r.modified) {
        let verb = if options.update.dry_run {
            "Would copy"
        } else {
            "Copied"
        };
        println!(
            "{} {} -> {}",
            verb,
            report.source.display(),
            report.target.display()
        );
        if cli.verbose {
            output_changes(&report.changes);
        }
        if let Some(diff) = &report.diff {
            println!("{}", diff);
        }
    }

    output_copy_summary(&summary);
    if cli.stats {
        let mut stats = RunStats::new();
        stats.files_scanned = summary.matched + summary.unmatched + summary.ambiguous;
        stats.files_modified = summary.modified;
        stats.files_unchanged = summary
            .matched
            .saturating_sub(summary.modified + summary.failed);
        stats.files_failed = summary.failed;
        for report in &summary.reports {
            stats.record_changes(&report.changes);
        }
        output_stats(&stats, options.update.output_format)?;
    }
    Ok(())
}

fn selected_mode(cli: &Cli) -> Option<Mode> {
    if cli.to_array {
        Some(Mode::ToArray)
    } else if cli.to_string {
        Some(Mode::ToString)
    } else if cli.analyze {
        Some(Mode::Analyze)
    } else if cli.validate {
        Some(Mode::Validate)
    } else {
        None
    }
}

fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn transform_request(cli: &Cli) -> std::result::Result<TransformRequest, FmBatchError> {
    let mode = selected_mode(cli);
    let fields = clean_list(&cli.fields);

    if let Some(mode @ (Mode::ToArray | Mode::ToString | Mode::Validate)) = mode {
        if fields.is_empty() {
            return Err(FmBatchError::config(format!("--{mode} requires --fields")));
        }
    }
    if cli.delimiter.is_empty() {
        return Err(FmBatchError::config("--delimiter cannot be empty"));
    }

    let add_field = match cli.add_field.as_deref() {
        Some([name]) => Some((name.clone(), parse_cli_value(""))),
        Some([name, value]) => Some((name.clone(), parse_cli_value(value))),
        Some(_) => return Err(FmBatchError::config("--add-field takes NAME [VALUE]")),
        None => None,
    };
    let rename_field = match cli.rename_field.as_deref() {
        Some([from, to]) => Some((from.clone(), to.clone())),
        Some(_) => return Err(FmBatchError::config("--rename-field takes OLD NEW")),
        None => None,
    };

    let request = TransformRequest {
        mode,
        fields,
        delimiter: cli.delimiter.clone(),
        sort_arrays: cli.sort_arrays,
        unique_values: cli.unique_values,
        add_field,
        remove_field: cli.remove_field.clone(),
        rename_field,
    };

    if request.mode.is_none() && !request.is_mutating() {
        return Err(FmBatchError::config(
            "nothing to do: pick a mode or a field operation",
        ));
    }
    let has_field_ops = request.add_field.is_some()
        || request.remove_field.is_some()
        || request.rename_field.is_some();
    if let Some(mode) = request.mode.filter(|m| m.is_terminal()) {
        if has_field_ops {
            warn!("Field operations are ignored with --{}", mode);
        }
    }
    Ok(request)
}

fn walk_options(cli: &Cli) -> std::result::Result<WalkOptions, FmBatchError> {
    let pattern = cli
        .pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|e| FmBatchError::config(format!("invalid --pattern: {e}")))?;

    Ok(WalkOptions {
        recursive: !cli.no_recursive,
        pattern,
        ..Default::default()
    }
    .with_extensions(&cli.extension))
}

fn update_options(cli: &Cli) -> UpdateOptions {
    UpdateOptions {
        dry_run: cli.dry_run,
        output_format: cli.output_format.into(),
    }
}

fn output_report(report: &Report, verbose: bool) {
    let path = report.path.display();
    match &report.outcome {
        Outcome::Analyzed { fields, values } => {
            println!("{}: {}", path, fields.join(", "));
            for (name, value) in values {
                println!("  {}: {}", name, preview(value));
            }
        }
        Outcome::Validated { missing } if missing.is_empty() => println!("{}: ✓ OK", path),
        Outcome::Validated { missing } => {
            println!("{}: ✗ missing {}", path, missing.join(", "))
        }
        Outcome::Changed(changes) if report.modified => {
            if verbose || report.dry_run {
                println!("{}:", path);
                output_changes(changes);
            }
            if let Some(diff) = &report.diff {
                println!("{}", diff);
            }
        }
        Outcome::Changed(_) => debug!("Unchanged: {}", path),
    }
}

fn output_changes(changes: &[ChangeRecord]) {
    for change in changes {
        let old = change.old_value.as_ref().map_or("-".to_string(), preview);
        let new = change.new_value.as_ref().map_or("-".to_string(), preview);
        println!("  {} {}: {} -> {}", change.kind, change.field, old, new);
    }
}

fn output_field_usage(stats: &RunStats) {
    let fields = stats.top_fields();
    if fields.is_empty() {
        return;
    }
    println!("Field usage:");
    for (name, count) in fields {
        println!("  {}: {}", name, count);
    }
}

fn output_copy_summary(summary: &CopySummary) {
    println!(
        "Matched {} files, modified {}",
        summary.matched, summary.modified
    );
    if summary.unmatched + summary.ambiguous + summary.failed > 0 {
        println!(
            "Skipped {} unmatched, {} ambiguous, {} failed",
            summary.unmatched, summary.ambiguous, summary.failed
        );
    }
}

fn output_stats(stats: &RunStats, format: OutputFormat) -> Result<()> {
    let output = match format {
        OutputFormat::Yaml => serde_yaml::to_string(stats)?,
        OutputFormat::Json => serde_json::to_string_pretty(stats)?,
    };
    println!("{}", output.trim_end());
    Ok(())
}
