//! PNG output of a [`Raster`].
//!
//! Feature-gated behind `png` (default on) so wasm builds can depend on the
//! scenes crate without pulling in the `image` crate. The pixels themselves
//! come from [`crate::raster`] (always available).

use crate::raster::Raster;
use constellation_core::error::SceneError;
use std::path::Path;

fn to_image(raster: &Raster) -> Result<image::RgbaImage, SceneError> {
    let w = u32::try_from(raster.width()).map_err(|_| SceneError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| SceneError::InvalidDimensions)?;
    image::RgbaImage::from_raw(w, h, raster.pixels().to_vec())
        .ok_or_else(|| SceneError::Io("RGBA buffer size mismatch".into()))
}

/// Writes the raster as a PNG file.
///
/// Returns `SceneError::InvalidDimensions` if the size overflows `u32`, or
/// `SceneError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), SceneError> {
    to_image(raster)?
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| SceneError::Io(e.to_string()))
}

/// Encodes the raster as PNG bytes in memory.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, SceneError> {
    let mut out = std::io::Cursor::new(Vec::new());
    to_image(raster)?
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| SceneError::Io(e.to_string()))?;
    Ok(out.into_inner())
}
