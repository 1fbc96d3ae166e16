//! Tile compositor: four children at zoom Z+1 into one parent at zoom Z.

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use tracing::trace;

use crate::tile::{TileError, TileId, TileStore};

/// Downsamples 2×2 blocks of sibling tiles into parent tiles.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    tile_size: u32,
}

impl Compositor {
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    /// Composes four children into their parent.
    ///
    /// Children are ordered top-left, top-right, bottom-left, bottom-right.
    /// They are alpha-composited into the quadrants of a transparent canvas
    /// twice the tile size, which is then downsampled with Lanczos3.
    pub fn compose(&self, children: [&RgbaImage; 4]) -> RgbaImage {
        let t = self.tile_size;
        let mut canvas = RgbaImage::new(t * 2, t * 2);

        for (i, child) in children.into_iter().enumerate() {
            let (dx, dy) = ((i % 2) as i64, (i / 2) as i64);
            if child.dimensions() == (t, t) {
                imageops::overlay(&mut canvas, child, dx * t as i64, dy * t as i64);
            } else {
                let scaled = imageops::resize(child, t, t, FilterType::Triangle);
                imageops::overlay(&mut canvas, &scaled, dx * t as i64, dy * t as i64);
            }
        }

        imageops::resize(&canvas, t, t, FilterType::Lanczos3)
    }

    /// Reads the children of `parent` from the store and encodes the parent.
    ///
    /// Nothing is written; the caller stores the returned PNG.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::MissingChild`] if any child has not been written.
    pub fn compose_from_store(
        &self,
        store: &TileStore,
        parent: &TileId,
    ) -> Result<Vec<u8>, TileError> {
        let ids = parent.children();
        let mut images = Vec::with_capacity(4);
        for child in &ids {
            if store.modified(child)?.is_none() {
                return Err(TileError::MissingChild {
                    parent: *parent,
                    child: *child,
                });
            }
            images.push(load_rgba(store, child)?);
        }

        let composed = self.compose([&images[0], &images[1], &images[2], &images[3]]);
        let bytes = encode_rgba(&composed).map_err(|e| TileError::Encode {
            tile: *parent,
            reason: e.to_string(),
        })?;

        trace!(tile = %parent, bytes = bytes.len(), "Composed tile");
        Ok(bytes)
    }
}

/// Decodes a stored tile, expanding indexed transparency to explicit alpha.
pub fn load_rgba(store: &TileStore, id: &TileId) -> Result<RgbaImage, TileError> {
    let bytes = store.read(id)?;
    image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map(|image| image.to_rgba8())
        .map_err(|e| TileError::Decode {
            path: store.tile_path(id),
            reason: e.to_string(),
        })
}

/// Encodes an RGBA image as PNG.
///
/// Uses fast settings; the compression pass re-encodes changed tiles later.
pub fn encode_rgba(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buffer, CompressionType::Fast, PngFilter::Adaptive);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buffer)
}
