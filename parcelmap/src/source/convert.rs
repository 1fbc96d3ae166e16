//! Source image validation and reduction to a bilevel leaf.

use std::path::Path;

use image::ImageFormat;

use super::SourceError;
use crate::placeholder::BilevelImage;

/// Threshold at or above which a channel counts as "on".
const THRESHOLD: u8 = 128;

/// Decoded content of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceContent {
    /// A valid parcel reduced to one bit per pixel
    Parcel(BilevelImage),
    /// A 1×1 image left behind when a parcel is deleted
    DeletionMarker,
}

/// Loads a source file and reduces it to a bilevel leaf.
///
/// Pixels with alpha below 128 or luma of 128 and above become transparent;
/// everything else becomes opaque black.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read, is not a decodable PNG,
/// or is not `tile_size` pixels square. Callers treat these as absent
/// sources.
pub fn load_source(path: &Path, tile_size: u32) -> Result<SourceContent, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png).map_err(
        |source| SourceError::Decode {
            path: path.to_path_buf(),
            source,
        },
    )?;

    let (width, height) = (image.width(), image.height());
    if (width, height) == (1, 1) {
        return Ok(SourceContent::DeletionMarker);
    }
    if (width, height) != (tile_size, tile_size) {
        return Err(SourceError::Dimensions {
            path: path.to_path_buf(),
            width,
            height,
            expected: tile_size,
        });
    }

    let pixels = image.to_luma_alpha8();
    let parcel = BilevelImage::from_fn(width, height, |x, y| {
        let [luma, alpha] = pixels.get_pixel(x, y).0;
        alpha >= THRESHOLD && luma < THRESHOLD
    });

    Ok(SourceContent::Parcel(parcel))
}
