//! Compare command implementation
//!
//! Compares two versions of one icon sheet and prints a numbered Markdown
//! table of changed sprites. Either side may be absent, which models an added
//! or removed file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use icondiff_core::{generate_diff, ChangeKind, EncodeConfig, SheetDiff};

use super::json_output::{error_codes, CompareOutput, FileDiffResult, JsonError};
use crate::report::render_markdown;
use crate::store::ArtifactStore;

/// Run the compare command
///
/// # Arguments
/// * `before` - Path to the old sheet, if it existed
/// * `after` - Path to the new sheet, if it exists
/// * `name` - Display name (defaults to the file name)
/// * `out` - Directory to write sprite artifacts into
/// * `config` - Sprite encoder settings
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(
    before: Option<&str>,
    after: Option<&str>,
    name: Option<&str>,
    out: Option<&str>,
    config: &EncodeConfig,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(before, after, name, out, config)
    } else {
        run_human(before, after, name, out, config)
    }
}

/// Run compare with human-readable (colored) output
fn run_human(
    before: Option<&str>,
    after: Option<&str>,
    name: Option<&str>,
    out: Option<&str>,
    config: &EncodeConfig,
) -> Result<ExitCode> {
    if before.is_none() && after.is_none() {
        anyhow::bail!("At least one of --before or --after is required");
    }
    let display_name = display_name(before, after, name);

    println!("{} {}", "Comparing sheet:".cyan().bold(), display_name);
    if let Some(path) = before {
        println!("  {} {}", "Before:".dimmed(), path);
    }
    if let Some(path) = after {
        println!("  {} {}", "After:".dimmed(), path);
    }

    let before_bytes = read_optional(before, "before")?;
    let after_bytes = read_optional(after, "after")?;

    let diff = generate_diff(before_bytes.as_deref(), after_bytes.as_deref(), config)
        .with_context(|| format!("Invalid sheet description in {}", display_name))?;

    let store = out.map(ArtifactStore::open).transpose()?;
    if let Some(store) = &store {
        let written = store.put_records(diff.records())?;
        println!(
            "  {} {} new artifact(s) in {}",
            "Wrote".dimmed(),
            written,
            store.root().display()
        );
    }

    println!();
    print!("{}", render_markdown(&display_name, &diff, out));
    println!();
    print_summary(&diff);

    Ok(ExitCode::SUCCESS)
}

/// Run compare with machine-readable JSON output
fn run_json(
    before: Option<&str>,
    after: Option<&str>,
    name: Option<&str>,
    out: Option<&str>,
    config: &EncodeConfig,
) -> Result<ExitCode> {
    if before.is_none() && after.is_none() {
        let error = JsonError::new(
            error_codes::MISSING_INPUT,
            "At least one of --before or --after is required",
        );
        return print_failure(error);
    }
    let display_name = display_name(before, after, name);

    let mut sides = Vec::with_capacity(2);
    for (path, label) in [(before, "before"), (after, "after")] {
        match read_optional(path, label) {
            Ok(bytes) => sides.push(bytes),
            Err(e) => {
                let error = JsonError::new(error_codes::FILE_READ, format!("{:#}", e))
                    .with_file(path.unwrap_or_default());
                return print_failure(error);
            }
        }
    }
    let after_bytes = sides.pop().flatten();
    let before_bytes = sides.pop().flatten();

    let diff = match generate_diff(before_bytes.as_deref(), after_bytes.as_deref(), config) {
        Ok(diff) => diff,
        Err(e) => {
            let error = JsonError::new(
                error_codes::INVALID_DESCRIPTION,
                format!("Invalid sheet description: {}", e.kind),
            )
            .with_file(display_name)
            .with_line(e.line);
            return print_failure(error);
        }
    };

    if let Some(out) = out {
        let written = ArtifactStore::open(out).and_then(|store| store.put_records(diff.records()));
        if let Err(e) = written {
            let error = JsonError::new(error_codes::OUTPUT_WRITE, format!("{:#}", e)).with_file(out);
            return print_failure(error);
        }
    }

    let output = CompareOutput::success(FileDiffResult::from_diff(display_name, &diff));
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(ExitCode::SUCCESS)
}

fn print_failure(error: JsonError) -> Result<ExitCode> {
    let output = CompareOutput::failure(vec![error]);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::from(1))
}

fn print_summary(diff: &SheetDiff) {
    match diff {
        SheetDiff::RenderFailed { side, reason } => {
            println!(
                "{} {} side could not be rendered: {}",
                "WARN".yellow().bold(),
                side,
                reason
            );
        }
        SheetDiff::Changes(records) if records.is_empty() => {
            println!("{}", "No sprite changes".green().bold());
        }
        SheetDiff::Changes(records) => {
            let count = |kind: ChangeKind| records.iter().filter(|r| r.kind() == kind).count();
            println!(
                "{} {} added, {} removed, {} modified",
                "Changes:".cyan().bold(),
                count(ChangeKind::Added),
                count(ChangeKind::Removed),
                count(ChangeKind::Modified)
            );
        }
    }
}

/// Reads a sheet if a path was given.
pub(crate) fn read_optional(path: Option<&str>, label: &str) -> Result<Option<Vec<u8>>> {
    path.map(|path| {
        fs::read(path).with_context(|| format!("Failed to read {} sheet: {}", label, path))
    })
    .transpose()
}

fn display_name(before: Option<&str>, after: Option<&str>, name: Option<&str>) -> String {
    if let Some(name) = name {
        return name.to_string();
    }
    after
        .or(before)
        .map(|path| {
            Path::new(path)
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string())
        })
        .unwrap_or_default()
}
