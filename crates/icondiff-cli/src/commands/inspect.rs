//! Inspect command implementation
//!
//! Prints the parsed description of one sheet and the sprites it resolves to.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::process::ExitCode;

use icondiff_core::{extract_sprites, load_sheet, EncodeConfig, SheetError};

use super::json_output::{error_codes, InspectOutput, InspectResult, JsonError};
use crate::report::short_fingerprint;

/// Run the inspect command
///
/// # Arguments
/// * `input` - Path to the sheet
/// * `config` - Sprite encoder settings
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(input: &str, config: &EncodeConfig, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(input, config)
    } else {
        run_human(input, config)
    }
}

fn run_human(input: &str, config: &EncodeConfig) -> Result<ExitCode> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read sheet: {}", input))?;
    let result = inspect(input, &bytes, config)
        .with_context(|| format!("Failed to inspect sheet: {}", input))?;
    let doc = &result.document;

    println!("{} {}", "Sheet:".cyan().bold(), input);
    println!("  {} {}", "Version:".dimmed(), doc.version);
    println!("  {} {}x{}", "Cell size:".dimmed(), doc.width, doc.height);
    println!("  {} {}", "States:".dimmed(), doc.states.len());

    for state in &doc.states {
        let mut line = format!(
            "    {:?} dirs={} frames={}",
            state.name, state.dirs, state.frames
        );
        if !state.delays.is_empty() {
            let delays: Vec<String> = state.delays.iter().map(|d| d.to_string()).collect();
            line.push_str(&format!(" delay={}", delays.join(",")));
        }
        if state.rewind {
            line.push_str(" rewind");
        }
        if let Some(count) = state.loop_count {
            line.push_str(&format!(" loop={}", count));
        }
        println!("{}", line);
    }

    println!("\n{}", "Sprites:".cyan().bold());
    for sprite in &result.sprites {
        let kind = if sprite.sprite.animated {
            format!("gif, {} frames", sprite.sprite.frames)
        } else {
            "png".to_string()
        };
        println!(
            "  {} {:?} {}x{} ({})",
            short_fingerprint(&sprite.sprite.fingerprint).dimmed(),
            sprite.name,
            sprite.sprite.width,
            sprite.sprite.height,
            kind
        );
    }

    Ok(ExitCode::SUCCESS)
}

fn run_json(input: &str, config: &EncodeConfig) -> Result<ExitCode> {
    let bytes = match fs::read(input) {
        Ok(bytes) => bytes,
        Err(e) => {
            let error = JsonError::new(error_codes::FILE_READ, format!("Failed to read sheet: {}", e))
                .with_file(input);
            return print_failure(error);
        }
    };

    match inspect(input, &bytes, config) {
        Ok(result) => {
            let output = InspectOutput::success(result);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(SheetError::Parse(e)) => {
            let error = JsonError::new(
                error_codes::INVALID_DESCRIPTION,
                format!("Invalid sheet description: {}", e.kind),
            )
            .with_file(input)
            .with_line(e.line);
            print_failure(error)
        }
        Err(SheetError::Decode(e)) => {
            let error = JsonError::new(error_codes::RENDER_FAILED, e.to_string()).with_file(input);
            print_failure(error)
        }
    }
}

fn print_failure(error: JsonError) -> Result<ExitCode> {
    let output = InspectOutput::failure(vec![error]);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::from(1))
}

/// Parses and renders one sheet.
pub fn inspect(path: &str, bytes: &[u8], config: &EncodeConfig) -> Result<InspectResult, SheetError> {
    let (document, raster) = load_sheet(bytes)?;
    let sprites = extract_sprites(&document, &raster, config)?;
    Ok(InspectResult::new(path, document, &sprites))
}
