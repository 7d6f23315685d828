//! End-to-end sheet comparison.
//!
//! Combines container reading, description parsing, compositing and diffing.
//! Grammar errors abort the comparison; render failures degrade to
//! [`SheetDiff::RenderFailed`] so a batch of files can keep going.

use std::fmt;
use std::thread;

use image::RgbaImage;
use serde::Serialize;

use crate::artifact::SpriteMap;
use crate::compositor::extract_sprites;
use crate::container::read_sheet;
use crate::diff::{diff_sprites, DiffRecord};
use crate::encode::EncodeConfig;
use crate::error::{DecodeError, ParseError, SheetError};
use crate::metadata::{extract_description, parse_description, SheetDocument};

/// Which side of a comparison a result refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Before,
    After,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Before => f.write_str("before"),
            Side::After => f.write_str("after"),
        }
    }
}

/// Outcome of comparing two versions of one sheet.
#[derive(Debug, Clone)]
pub enum SheetDiff {
    /// Per-sprite changes, possibly empty.
    Changes(Vec<DiffRecord>),
    /// One side could not be rendered.
    RenderFailed { side: Side, reason: String },
}

impl SheetDiff {
    /// Records of a successful comparison, empty for a render failure.
    pub fn records(&self) -> &[DiffRecord] {
        match self {
            SheetDiff::Changes(records) => records,
            SheetDiff::RenderFailed { .. } => &[],
        }
    }
}

/// Decodes a sheet and parses its description without rendering sprites.
pub fn load_sheet(bytes: &[u8]) -> Result<(SheetDocument, RgbaImage), SheetError> {
    let sheet = read_sheet(bytes)?;
    let document = parse_description(extract_description(&sheet.description))?;
    Ok((document, sheet.raster))
}

/// Renders every sprite of a sheet. An absent sheet yields an empty map.
///
/// # Errors
/// [`SheetError::Parse`] for grammar errors, [`SheetError::Decode`] for
/// container or render failures.
pub fn extract(bytes: Option<&[u8]>, config: &EncodeConfig) -> Result<SpriteMap, SheetError> {
    let bytes = match bytes {
        Some(bytes) => bytes,
        None => return Ok(SpriteMap::new()),
    };
    let (document, raster) = load_sheet(bytes)?;
    Ok(extract_sprites(&document, &raster, config)?)
}

/// Compares two versions of a sheet.
///
/// Both sides are extracted independently on their own threads.
///
/// # Errors
/// Returns the [`ParseError`] of the first side (before, then after) whose
/// description is invalid.
pub fn generate_diff(
    before: Option<&[u8]>,
    after: Option<&[u8]>,
    config: &EncodeConfig,
) -> Result<SheetDiff, ParseError> {
    let (before_result, after_result) = thread::scope(|scope| {
        let before_handle = scope.spawn(|| extract(before, config));
        let after_result = extract(after, config);
        let before_result = before_handle
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (before_result, after_result)
    });

    let before_map = split_parse_error(before_result)?;
    let after_map = split_parse_error(after_result)?;

    let (before_map, after_map) = match (before_map, after_map) {
        (Ok(before_map), Ok(after_map)) => (before_map, after_map),
        (Err(err), _) => return Ok(render_failed(Side::Before, err)),
        (_, Err(err)) => return Ok(render_failed(Side::After, err)),
    };

    let records = diff_sprites(&before_map, &after_map);
    tracing::debug!(records = records.len(), "generated sheet diff");
    Ok(SheetDiff::Changes(records))
}

fn split_parse_error(
    result: Result<SpriteMap, SheetError>,
) -> Result<Result<SpriteMap, DecodeError>, ParseError> {
    match result {
        Ok(map) => Ok(Ok(map)),
        Err(SheetError::Parse(err)) => Err(err),
        Err(SheetError::Decode(err)) => Ok(Err(err)),
    }
}

fn render_failed(side: Side, err: DecodeError) -> SheetDiff {
    tracing::warn!(side = %side, error = %err, "sheet render failed");
    SheetDiff::RenderFailed {
        side,
        reason: err.to_string(),
    }
}
