//! Deterministic sprite encoders.
//!
//! Static sprites are written as PNG and animated sprites as GIF. Both use
//! fixed settings so the same pixels always produce the same bytes, which is
//! what makes fingerprint-based deduplication and diffing work.

use std::io::Write;

use gif::{DisposalMethod, Repeat};
use image::RgbaImage;
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

/// Errors from sprite encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    #[error("GIF encoding error: {0}")]
    Gif(#[from] gif::EncodingError),

    /// GIF frames are limited to 65535 pixels per side.
    #[error("animation frame {width}x{height} exceeds GIF limits")]
    FrameTooLarge { width: u32, height: u32 },

    /// An animation needs at least one frame.
    #[error("animation has no frames")]
    EmptyAnimation,
}

/// Encoder settings. Use a fixed value for determinism.
#[derive(Debug, Clone, Copy)]
pub struct EncodeConfig {
    /// PNG compression level for static sprites.
    pub compression: Compression,
    /// PNG filter type for static sprites.
    pub filter: FilterType,
    /// GIF colour quantization speed, 1 (best) to 30 (fastest).
    pub gif_speed: i32,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
            gif_speed: 10,
        }
    }
}

impl EncodeConfig {
    /// Smallest output, slowest encode.
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
            gif_speed: 1,
        }
    }

    /// Fastest encode, larger output.
    pub fn fast() -> Self {
        Self {
            compression: Compression::Fast,
            filter: FilterType::NoFilter,
            gif_speed: 30,
        }
    }

    /// Returns a copy with the GIF speed clamped into the valid range.
    pub fn with_gif_speed(mut self, speed: i32) -> Self {
        self.gif_speed = speed.clamp(1, 30);
        self
    }
}

/// One frame of an animation with its display time in hundredths of a second.
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    pub image: RgbaImage,
    pub delay: u16,
}

/// Converts a delay in tenths of a second to GIF hundredths.
pub fn delay_to_centiseconds(delay: f64) -> u16 {
    (delay * 10.0).round().clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Computes the BLAKE3 fingerprint of encoded sprite bytes.
pub fn fingerprint(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Write an RGBA image as PNG to any writer.
pub fn write_png_to_writer<W: Write>(
    image: &RgbaImage,
    writer: W,
    config: &EncodeConfig,
) -> Result<(), EncodeError> {
    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(image.as_raw())?;

    Ok(())
}

/// Encode an RGBA image as PNG.
pub fn encode_png(image: &RgbaImage, config: &EncodeConfig) -> Result<Vec<u8>, EncodeError> {
    let mut data = Vec::new();
    write_png_to_writer(image, &mut data, config)?;
    Ok(data)
}

/// Encode an animation as GIF.
///
/// `repeat` is the loop count; `None` loops forever. All frames must share
/// the size of the first frame.
pub fn encode_gif(
    frames: &[AnimationFrame],
    repeat: Option<u32>,
    config: &EncodeConfig,
) -> Result<Vec<u8>, EncodeError> {
    let first = frames.first().ok_or(EncodeError::EmptyAnimation)?;
    let (width, height) = gif_dimensions(&first.image)?;
    // The quantizer asserts on speeds outside 1..=30.
    let speed = config.gif_speed.clamp(1, 30);

    let mut data = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut data, width, height, &[])?;
        encoder.set_repeat(match repeat {
            Some(count) => Repeat::Finite(count.min(u32::from(u16::MAX)) as u16),
            None => Repeat::Infinite,
        })?;

        for frame in frames {
            let (frame_width, frame_height) = gif_dimensions(&frame.image)?;
            let mut pixels = frame.image.as_raw().clone();
            let mut gif_frame =
                gif::Frame::from_rgba_speed(frame_width, frame_height, &mut pixels, speed);
            gif_frame.delay = frame.delay;
            // Clear between frames so transparent pixels do not show the previous frame.
            gif_frame.dispose = DisposalMethod::Background;
            encoder.write_frame(&gif_frame)?;
        }
    }

    Ok(data)
}

fn gif_dimensions(image: &RgbaImage) -> Result<(u16, u16), EncodeError> {
    let too_large = || EncodeError::FrameTooLarge {
        width: image.width(),
        height: image.height(),
    };
    let width = u16::try_from(image.width()).map_err(|_| too_large())?;
    let height = u16::try_from(image.height()).map_err(|_| too_large())?;
    Ok((width, height))
}
