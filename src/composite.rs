use image::{DynamicImage, GenericImage, GenericImageView, ImageOutputFormat, RgbaImage};
use std::io::Cursor;

use crate::error::{BackupError, Result};

/// Stitch encoded tiles into one PNG.
///
/// `buffers` is in plan order and laid out `cols` tiles per row. The first
/// tile decides the cell size; every other tile must match it.
pub fn stitch_tiles(buffers: &[Vec<u8>], cols: u32) -> Result<Vec<u8>> {
    let first = buffers.first().ok_or(BackupError::NoTiles)?;
    if cols == 0 {
        return Err(BackupError::Composite("grid has zero columns".to_string()));
    }

    let (tile_width, tile_height) = image::load_from_memory(first)?.dimensions();
    let rows = (buffers.len() as u32).div_ceil(cols);

    let width = tile_width
        .checked_mul(cols)
        .ok_or_else(|| BackupError::Composite("canvas width overflows".to_string()))?;
    let height = tile_height
        .checked_mul(rows)
        .ok_or_else(|| BackupError::Composite("canvas height overflows".to_string()))?;

    debug!(
        "Compositing {} tiles of {}x{} into {}x{}",
        buffers.len(),
        tile_width,
        tile_height,
        width,
        height
    );

    // starts fully transparent
    let mut canvas = RgbaImage::new(width, height);

    for (index, buffer) in buffers.iter().enumerate() {
        let tile = image::load_from_memory(buffer)?;
        if tile.dimensions() != (tile_width, tile_height) {
            return Err(BackupError::TileSizeMismatch {
                index,
                expected: (tile_width, tile_height),
                actual: tile.dimensions(),
            });
        }

        let row = index as u32 / cols;
        let col = index as u32 % cols;
        canvas.copy_from(&tile.to_rgba8(), col * tile_width, row * tile_height)?;
    }

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
    Ok(png)
}
