//! PNG encoding of canvas rasters. No custom header or versioning: a
//! persisted drawing is a plain PNG.

use crate::Result;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// Encode a raster as PNG bytes
pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    raster.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Decode PNG bytes into an RGBA raster
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8())
}
