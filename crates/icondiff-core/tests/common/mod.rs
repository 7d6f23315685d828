//! Fixture builders shared by the integration tests.

#![allow(dead_code)]

use image::{Rgba, RgbaImage};

/// Wraps `body` in the description markers with a standard header.
pub fn description(cell: u32, body: &str) -> String {
    format!(
        "# BEGIN DMI\nversion = 4.0\n\twidth = {cell}\n\theight = {cell}\n{body}# END DMI\n"
    )
}

/// Encodes `raster` as a sheet container carrying `text` in a zTXt chunk.
pub fn sheet_png(text: &str, raster: &RgbaImage) -> Vec<u8> {
    let mut data = Vec::new();
    let mut encoder = png::Encoder::new(&mut data, raster.width(), raster.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder
        .add_ztxt_chunk("Description".to_string(), text.to_string())
        .unwrap();
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(raster.as_raw()).unwrap();
    drop(writer);
    data
}

/// A single-row sheet of `cells` solid cells with the given colours.
pub fn strip(cell: u32, colors: &[[u8; 4]]) -> RgbaImage {
    RgbaImage::from_fn(cell * colors.len() as u32, cell, |x, _| {
        Rgba(colors[(x / cell) as usize])
    })
}

pub const RED: [u8; 4] = [255, 0, 0, 255];
pub const GREEN: [u8; 4] = [0, 255, 0, 255];
pub const BLUE: [u8; 4] = [0, 0, 255, 255];
pub const CLEAR: [u8; 4] = [0, 0, 0, 0];
