//! Bilevel tile encoding and the canonical placeholder tile.
//!
//! Leaves are stored as 1-bit indexed PNGs with a two-entry palette:
//! index 0 is fully transparent, index 1 is opaque black. The placeholder is
//! a full-size tile in which every pixel is index 0.

use png::{BitDepth, ColorType, Compression, Encoder};

/// Palette shared by every bilevel tile: transparent white, opaque black.
const PALETTE: [u8; 6] = [255, 255, 255, 0, 0, 0];

/// Alpha values for the palette entries. Entries past the end are opaque.
const TRANSPARENCY: [u8; 1] = [0];

/// A 1-bit raster, one bit per pixel, rows padded to whole bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BilevelImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BilevelImage {
    /// A fully transparent image.
    pub fn transparent(width: u32, height: u32) -> Self {
        let stride = Self::stride_for(width);
        Self {
            width,
            height,
            data: vec![0; stride * height as usize],
        }
    }

    /// Builds an image by asking `ink` whether each pixel is opaque black.
    pub fn from_fn(width: u32, height: u32, mut ink: impl FnMut(u32, u32) -> bool) -> Self {
        let mut image = Self::transparent(width, height);
        for y in 0..height {
            for x in 0..width {
                if ink(x, y) {
                    image.set_ink(x, y);
                }
            }
        }
        image
    }

    /// Whether the pixel at (`x`, `y`) is opaque black.
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        let (byte, mask) = self.locate(x, y);
        self.data[byte] & mask != 0
    }

    /// Number of opaque pixels.
    pub fn ink_count(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Encodes the image as an indexed 1-bit PNG.
    pub fn encode_png(&self, compression: Compression) -> Result<Vec<u8>, png::EncodingError> {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, self.width, self.height);
            encoder.set_color(ColorType::Indexed);
            encoder.set_depth(BitDepth::One);
            encoder.set_palette(PALETTE.to_vec());
            encoder.set_trns(TRANSPARENCY.to_vec());
            encoder.set_compression(compression);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.data)?;
            writer.finish()?;
        }
        Ok(buffer)
    }

    fn set_ink(&mut self, x: u32, y: u32) {
        let (byte, mask) = self.locate(x, y);
        self.data[byte] |= mask;
    }

    fn locate(&self, x: u32, y: u32) -> (usize, u8) {
        let stride = Self::stride_for(self.width);
        let byte = y as usize * stride + (x / 8) as usize;
        // Most significant bit is the leftmost pixel.
        (byte, 0x80 >> (x % 8))
    }

    fn stride_for(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }
}

/// Encodes the canonical placeholder tile for `tile_size`.
///
/// # Examples
///
/// ```
/// let bytes = parcelmap::placeholder::generate_placeholder(500).unwrap();
/// assert_eq!(&bytes[1..4], b"PNG");
/// ```
pub fn generate_placeholder(tile_size: u32) -> Result<Vec<u8>, png::EncodingError> {
    BilevelImage::transparent(tile_size, tile_size).encode_png(Compression::Best)
}
