//! Reading the PNG container that carries a sheet.
//!
//! The description lives in a text chunk keyed `Description` (normally
//! `zTXt`); the pixel grid is the PNG image itself.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::error::DecodeError;

/// Keyword of the text chunk holding the sheet description.
pub const DESCRIPTION_KEYWORD: &str = "Description";

/// A decoded container: raw description text plus the RGBA pixel grid.
#[derive(Debug, Clone)]
pub struct SheetImage {
    pub description: String,
    pub raster: RgbaImage,
}

/// Decodes a sheet container.
///
/// # Errors
/// Returns a [`DecodeError`] if the PNG is corrupt or unsupported, or carries
/// no `Description` chunk.
pub fn read_sheet(bytes: &[u8]) -> Result<SheetImage, DecodeError> {
    let description = read_description(bytes)?;
    // Sources without alpha come back fully opaque; transparency is kept otherwise.
    let raster = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();

    tracing::debug!(
        width = raster.width(),
        height = raster.height(),
        description_len = description.len(),
        "decoded sheet container"
    );

    Ok(SheetImage {
        description,
        raster,
    })
}

/// Pulls the `Description` text out of a PNG container.
pub fn read_description(bytes: &[u8]) -> Result<String, DecodeError> {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let mut reader = decoder.read_info()?;

    if let Some(text) = find_description(reader.info())? {
        return Ok(text);
    }

    // Text chunks stored after the image data are only seen once it is consumed.
    let mut buffer = vec![0; reader.output_buffer_size()];
    reader.next_frame(&mut buffer)?;
    reader.finish()?;

    find_description(reader.info())?.ok_or(DecodeError::MissingDescription)
}

fn find_description(info: &png::Info) -> Result<Option<String>, DecodeError> {
    if let Some(chunk) = info
        .compressed_latin1_text
        .iter()
        .find(|chunk| chunk.keyword == DESCRIPTION_KEYWORD)
    {
        return Ok(Some(chunk.get_text()?));
    }
    if let Some(chunk) = info
        .uncompressed_latin1_text
        .iter()
        .find(|chunk| chunk.keyword == DESCRIPTION_KEYWORD)
    {
        return Ok(Some(chunk.text.clone()));
    }
    if let Some(chunk) = info
        .utf8_text
        .iter()
        .find(|chunk| chunk.keyword == DESCRIPTION_KEYWORD)
    {
        return Ok(Some(chunk.get_text()?));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_with_text(text: Option<&str>, compressed: bool, color: png::ColorType) -> Vec<u8> {
        let channels = match color {
            png::ColorType::Rgb => 3,
            _ => 4,
        };
        let mut data = Vec::new();
        let mut encoder = png::Encoder::new(&mut data, 2, 2);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        if let Some(text) = text {
            if compressed {
                encoder
                    .add_ztxt_chunk(DESCRIPTION_KEYWORD.to_string(), text.to_string())
                    .unwrap();
            } else {
                encoder
                    .add_text_chunk(DESCRIPTION_KEYWORD.to_string(), text.to_string())
                    .unwrap();
            }
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&vec![200u8; 2 * 2 * channels]).unwrap();
        drop(writer);
        data
    }

    #[test]
    fn test_reads_ztxt_description() {
        let data = png_with_text(Some("version = 4.0"), true, png::ColorType::Rgba);
        let sheet = read_sheet(&data).unwrap();
        assert_eq!(sheet.description, "version = 4.0");
        assert_eq!(sheet.raster.dimensions(), (2, 2));
    }

    #[test]
    fn test_reads_text_description() {
        let data = png_with_text(Some("version = 4.0"), false, png::ColorType::Rgba);
        assert_eq!(read_description(&data).unwrap(), "version = 4.0");
    }

    #[test]
    fn test_rgb_source_becomes_opaque_rgba() {
        let data = png_with_text(Some("x"), true, png::ColorType::Rgb);
        let sheet = read_sheet(&data).unwrap();
        assert!(sheet.raster.pixels().all(|p| p.0 == [200, 200, 200, 255]));
    }

    #[test]
    fn test_missing_description() {
        let data = png_with_text(None, true, png::ColorType::Rgba);
        assert!(matches!(
            read_sheet(&data),
            Err(DecodeError::MissingDescription)
        ));
    }

    #[test]
    fn test_corrupt_container() {
        assert!(matches!(
            read_sheet(b"definitely not a png"),
            Err(DecodeError::Png(_))
        ));
    }
}
