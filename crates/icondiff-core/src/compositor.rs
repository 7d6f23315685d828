//! Sprite compositing.
//!
//! Walks the sheet grid cell by cell in the order the description lists its
//! states, stitches direction strips, assembles animations and deduplicates
//! the encoded result by fingerprint.
//!
//! Cells are consumed sequentially across state boundaries: a state with F
//! frames and D directions takes the next F×D cells, frame-major.

use std::collections::HashMap;
use std::sync::Arc;

use image::{imageops, RgbaImage};

use crate::artifact::{SpriteArtifact, SpriteMap};
use crate::encode::{delay_to_centiseconds, encode_gif, encode_png, AnimationFrame, EncodeConfig};
use crate::error::DecodeError;
use crate::metadata::{SheetDocument, StateSpec};

/// Position of the next cell to read in the sheet grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterCursor {
    column: u32,
    row: u32,
    icons_per_line: u32,
}

impl RasterCursor {
    /// Starts at the top-left cell of a grid `icons_per_line` cells wide.
    pub fn new(icons_per_line: u32) -> Self {
        Self {
            column: 0,
            row: 0,
            icons_per_line,
        }
    }

    /// Current `(column, row)`.
    pub fn position(&self) -> (u32, u32) {
        (self.column, self.row)
    }

    /// Returns the current position and moves to the next cell.
    pub fn advance(&mut self) -> (u32, u32) {
        let current = self.position();
        self.column += 1;
        if self.column >= self.icons_per_line {
            self.column = 0;
            self.row += 1;
        }
        current
    }
}

/// Fingerprint → artifact table scoped to one extraction.
#[derive(Debug, Default)]
pub struct DedupTable {
    by_fingerprint: HashMap<String, Arc<SpriteArtifact>>,
}

impl DedupTable {
    /// Returns the shared artifact for this fingerprint, keeping the first one seen.
    pub fn intern(&mut self, artifact: SpriteArtifact) -> Arc<SpriteArtifact> {
        self.by_fingerprint
            .entry(artifact.fingerprint().to_string())
            .or_insert_with(|| Arc::new(artifact))
            .clone()
    }

    /// Number of distinct artifacts produced so far.
    pub fn len(&self) -> usize {
        self.by_fingerprint.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fingerprint.is_empty()
    }
}

/// Renders every state of `document` from `raster`.
///
/// # Errors
/// Returns a [`DecodeError`] when the grid does not hold the cells the
/// description asks for, or when encoding fails.
pub fn extract_sprites(
    document: &SheetDocument,
    raster: &RgbaImage,
    config: &EncodeConfig,
) -> Result<SpriteMap, DecodeError> {
    let mut sprites = SpriteMap::new();
    if document.states.is_empty() {
        return Ok(sprites);
    }

    let icons_per_line = raster.width() / document.width;
    if icons_per_line == 0 {
        return Err(DecodeError::SheetTooNarrow {
            sheet_width: raster.width(),
            cell_width: document.width,
        });
    }

    let mut cursor = RasterCursor::new(icons_per_line);
    let mut dedup = DedupTable::default();

    for state in &document.states {
        let artifact = render_state(state, document, raster, &mut cursor, config)?;
        let artifact = dedup.intern(artifact);
        let name = sprites.unique_name(&state.name);

        tracing::debug!(
            state = %state.name,
            resolved = %name,
            fingerprint = %artifact.fingerprint(),
            animated = artifact.is_animated(),
            "extracted sprite"
        );

        sprites.insert(name, artifact);
    }

    tracing::debug!(
        sprites = sprites.len(),
        unique = dedup.len(),
        "sheet extraction complete"
    );

    Ok(sprites)
}

/// Slices, stitches and encodes one state, advancing the shared cursor.
pub fn render_state(
    state: &StateSpec,
    document: &SheetDocument,
    raster: &RgbaImage,
    cursor: &mut RasterCursor,
    config: &EncodeConfig,
) -> Result<SpriteArtifact, DecodeError> {
    let (cell_width, cell_height) = (document.width, document.height);

    let mut frames = Vec::new();
    for _ in 0..state.frames {
        let mut cells = Vec::with_capacity(state.dirs as usize);
        for _ in 0..state.dirs {
            let (column, row) = cursor.advance();
            cells.push(slice_cell(raster, column, row, cell_width, cell_height)?);
        }
        frames.push(stitch_directions(&cells, cell_width, cell_height));
    }

    let strip_width = cell_width * state.dirs;
    if let [single] = frames.as_slice() {
        let data = encode_png(single, config)?;
        return Ok(SpriteArtifact::from_encoded(
            data,
            false,
            strip_width,
            cell_height,
            1,
        ));
    }

    let sequence = assemble_animation(frames, state);
    let frame_count = sequence.len();
    let data = encode_gif(&sequence, state.loop_count, config)?;
    Ok(SpriteArtifact::from_encoded(
        data,
        true,
        strip_width,
        cell_height,
        frame_count,
    ))
}

/// Copies one grid cell into its own image.
pub fn slice_cell(
    raster: &RgbaImage,
    column: u32,
    row: u32,
    cell_width: u32,
    cell_height: u32,
) -> Result<RgbaImage, DecodeError> {
    let out_of_bounds = || DecodeError::CellOutOfBounds {
        column,
        row,
        width: raster.width(),
        height: raster.height(),
    };

    let x = column.checked_mul(cell_width).ok_or_else(out_of_bounds)?;
    let y = row.checked_mul(cell_height).ok_or_else(out_of_bounds)?;
    let fits_x = x.checked_add(cell_width).is_some_and(|end| end <= raster.width());
    let fits_y = y.checked_add(cell_height).is_some_and(|end| end <= raster.height());
    if !fits_x || !fits_y {
        return Err(out_of_bounds());
    }

    Ok(imageops::crop_imm(raster, x, y, cell_width, cell_height).to_image())
}

/// Lays direction cells out left to right. A single cell is returned as-is.
pub fn stitch_directions(cells: &[RgbaImage], cell_width: u32, cell_height: u32) -> RgbaImage {
    if let [single] = cells {
        return single.clone();
    }

    let mut strip = RgbaImage::new(cell_width * cells.len() as u32, cell_height);
    for (index, cell) in cells.iter().enumerate() {
        imageops::replace(&mut strip, cell, i64::from(cell_width) * index as i64, 0);
    }
    strip
}

/// Frame indices in playback order.
///
/// With `rewind` the forward pass is followed by the frames in reverse,
/// without repeating either endpoint: `[0, 1, 2]` plays as `[0, 1, 2, 1]`.
pub fn playback_order(frame_count: usize, rewind: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..frame_count).collect();
    if rewind && frame_count > 2 {
        order.extend((1..frame_count - 1).rev());
    }
    order
}

/// Delay for forward frame `index`, in tenths of a second.
///
/// Missing entries fall back to the last listed delay, or 1 without any.
pub fn delay_at(delays: &[f64], index: usize) -> f64 {
    delays
        .get(index)
        .or_else(|| delays.last())
        .copied()
        .unwrap_or(1.0)
}

/// Per-frame GIF durations, in hundredths, in playback order.
pub fn frame_durations(state: &StateSpec) -> Vec<u16> {
    playback_order(state.frames as usize, state.rewind)
        .into_iter()
        .map(|index| delay_to_centiseconds(delay_at(&state.delays, index)))
        .collect()
}

/// Builds the animation sequence for `frames`, applying rewind and delays.
pub fn assemble_animation(frames: Vec<RgbaImage>, state: &StateSpec) -> Vec<AnimationFrame> {
    playback_order(frames.len(), state.rewind)
        .into_iter()
        .map(|index| AnimationFrame {
            image: frames[index].clone(),
            delay: delay_to_centiseconds(delay_at(&state.delays, index)),
        })
        .collect()
}
