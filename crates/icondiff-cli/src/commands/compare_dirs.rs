//! Compare-dirs command implementation
//!
//! Walks two directory trees for `*.dmi` sheets, pairs them by relative path
//! and compares each pair. A sheet that cannot be read or has an invalid
//! description is reported and skipped; it never stops the batch.

use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

use icondiff_core::{generate_diff, EncodeConfig, ParseError, SheetDiff};

use super::json_output::{error_codes, BatchSummary, CompareDirsOutput, FileDiffResult, JsonError};
use crate::report::render_markdown;
use crate::store::ArtifactStore;

/// File extension of icon sheets.
pub const SHEET_EXTENSION: &str = "dmi";

/// Why one sheet path produced no diff.
#[derive(Debug)]
pub enum FileFailure {
    /// A side could not be read from disk.
    Unreadable(String),
    /// A side has an invalid description.
    Invalid(ParseError),
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFailure::Unreadable(reason) => write!(f, "unreadable sheet: {}", reason),
            FileFailure::Invalid(e) => write!(f, "invalid sheet description: {}", e),
        }
    }
}

/// Result of comparing one sheet path.
#[derive(Debug)]
pub struct FileOutcome {
    /// Path relative to the compared roots, `/`-separated
    pub path: String,
    pub result: Result<SheetDiff, FileFailure>,
}

/// Run the compare-dirs command
///
/// # Returns
/// Exit code: 0 when every sheet was read and parsed, 1 otherwise
pub fn run(
    before_dir: &str,
    after_dir: &str,
    out: Option<&str>,
    config: &EncodeConfig,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(before_dir, after_dir, out, config)
    } else {
        run_human(before_dir, after_dir, out, config)
    }
}

fn run_human(
    before_dir: &str,
    after_dir: &str,
    out: Option<&str>,
    config: &EncodeConfig,
) -> Result<ExitCode> {
    println!("{}", "Comparing sheet trees:".cyan().bold());
    println!("  {} {}", "Before:".dimmed(), before_dir);
    println!("  {} {}", "After:".dimmed(), after_dir);

    let outcomes = compare_trees(Path::new(before_dir), Path::new(after_dir), config)?;
    let store = out.map(ArtifactStore::open).transpose()?;

    let mut summary = BatchSummary::default();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(diff) => {
                tally(&mut summary, diff);
                if let Some(store) = &store {
                    store.put_records(diff.records())?;
                }
                if matches!(diff, SheetDiff::Changes(records) if records.is_empty()) {
                    continue;
                }
                println!();
                print!("{}", render_markdown(&outcome.path, diff, out));
            }
            Err(failure) => {
                count_failure(&mut summary, failure);
                eprintln!("{} {}: {}", "FAIL".red().bold(), outcome.path, failure);
            }
        }
    }
    summary.total = outcomes.len();

    println!();
    println!(
        "{} {} sheet(s): {} changed, {} unchanged, {} render failed, {} invalid, {} unreadable",
        "Summary:".cyan().bold(),
        summary.total,
        summary.changed,
        summary.unchanged,
        summary.render_failed,
        summary.invalid,
        summary.unreadable
    );

    Ok(exit_code(&summary))
}

fn run_json(
    before_dir: &str,
    after_dir: &str,
    out: Option<&str>,
    config: &EncodeConfig,
) -> Result<ExitCode> {
    let outcomes = match compare_trees(Path::new(before_dir), Path::new(after_dir), config) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            let output = CompareDirsOutput {
                success: false,
                errors: vec![JsonError::new(error_codes::DIRECTORY_WALK, format!("{:#}", e))],
                files: Vec::new(),
                summary: BatchSummary::default(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(ExitCode::from(1));
        }
    };

    let store = match out.map(ArtifactStore::open).transpose() {
        Ok(store) => store,
        Err(e) => {
            let output = CompareDirsOutput {
                success: false,
                errors: vec![JsonError::new(error_codes::OUTPUT_WRITE, format!("{:#}", e))],
                files: Vec::new(),
                summary: BatchSummary::default(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(ExitCode::from(1));
        }
    };

    let mut summary = BatchSummary {
        total: outcomes.len(),
        ..BatchSummary::default()
    };
    let mut errors = Vec::new();
    let mut files = Vec::new();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(diff) => {
                tally(&mut summary, diff);
                if let Some(store) = &store {
                    if let Err(e) = store.put_records(diff.records()) {
                        errors.push(
                            JsonError::new(error_codes::OUTPUT_WRITE, format!("{:#}", e))
                                .with_file(&outcome.path),
                        );
                    }
                }
                files.push(FileDiffResult::from_diff(&outcome.path, diff));
            }
            Err(failure) => {
                count_failure(&mut summary, failure);
                errors.push(failure_to_json(&outcome.path, failure));
            }
        }
    }

    let code = exit_code(&summary);
    let output = CompareDirsOutput {
        success: errors.is_empty(),
        errors,
        files,
        summary,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(code)
}

/// Compares every sheet found under either root, in relative-path order.
pub fn compare_trees(
    before_root: &Path,
    after_root: &Path,
    config: &EncodeConfig,
) -> Result<Vec<FileOutcome>> {
    let before = collect_sheets(before_root)?;
    let after = collect_sheets(after_root)?;
    Ok(compare_sheets(&before, &after, config))
}

/// Compares sheets keyed by relative path. Every key yields one outcome.
pub fn compare_sheets(
    before: &BTreeMap<String, PathBuf>,
    after: &BTreeMap<String, PathBuf>,
    config: &EncodeConfig,
) -> Vec<FileOutcome> {
    let paths: BTreeSet<&String> = before.keys().chain(after.keys()).collect();

    let mut outcomes = Vec::with_capacity(paths.len());
    for path in paths {
        let result = compare_one(before.get(path), after.get(path), config);
        if let Err(failure) = &result {
            tracing::warn!(path = %path, error = %failure, "sheet skipped");
        } else {
            tracing::debug!(path = %path, "compared sheet");
        }
        outcomes.push(FileOutcome {
            path: path.clone(),
            result,
        });
    }
    outcomes
}

fn compare_one(
    before: Option<&PathBuf>,
    after: Option<&PathBuf>,
    config: &EncodeConfig,
) -> Result<SheetDiff, FileFailure> {
    let before_bytes = read_sheet_file(before).map_err(FileFailure::Unreadable)?;
    let after_bytes = read_sheet_file(after).map_err(FileFailure::Unreadable)?;
    generate_diff(before_bytes.as_deref(), after_bytes.as_deref(), config)
        .map_err(FileFailure::Invalid)
}

fn read_sheet_file(path: Option<&PathBuf>) -> Result<Option<Vec<u8>>, String> {
    path.map(|p| fs::read(p).map_err(|e| format!("{}: {}", p.display(), e)))
        .transpose()
}

/// Finds sheets under `root`, keyed by `/`-separated relative path.
pub fn collect_sheets(root: &Path) -> Result<BTreeMap<String, PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let mut sheets = BTreeMap::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry =
            entry.with_context(|| format!("Failed to walk directory: {}", root.display()))?;
        if !entry.file_type().is_file() || !is_sheet(entry.path()) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        sheets.insert(key, entry.path().to_path_buf());
    }
    Ok(sheets)
}

fn is_sheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(SHEET_EXTENSION))
}

fn count_failure(summary: &mut BatchSummary, failure: &FileFailure) {
    match failure {
        FileFailure::Unreadable(_) => summary.unreadable += 1,
        FileFailure::Invalid(_) => summary.invalid += 1,
    }
}

fn failure_to_json(path: &str, failure: &FileFailure) -> JsonError {
    match failure {
        FileFailure::Unreadable(reason) => {
            JsonError::new(error_codes::FILE_READ, format!("Failed to read sheet: {}", reason))
                .with_file(path)
        }
        FileFailure::Invalid(e) => JsonError::new(
            error_codes::INVALID_DESCRIPTION,
            format!("Invalid sheet description: {}", e.kind),
        )
        .with_file(path)
        .with_line(e.line),
    }
}

fn tally(summary: &mut BatchSummary, diff: &SheetDiff) {
    match diff {
        SheetDiff::RenderFailed { .. } => summary.render_failed += 1,
        SheetDiff::Changes(records) if records.is_empty() => summary.unchanged += 1,
        SheetDiff::Changes(_) => summary.changed += 1,
    }
}

fn exit_code(summary: &BatchSummary) -> ExitCode {
    if summary.invalid > 0 || summary.unreadable > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
