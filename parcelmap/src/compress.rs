//! Lossless re-encoding of freshly written tiles.
//!
//! Tiles are written with fast PNG settings during a build. This pass decodes
//! each changed tile without any colour transformation and re-encodes it with
//! maximum compression, keeping colour type, bit depth, palette and
//! transparency. The tile's modification time is preserved so that the
//! rewrite is invisible to the staleness rule.

use png::{AdaptiveFilterType, Compression, Decoder, Encoder, Transformations};
use thiserror::Error;

use crate::tile::{TileError, TileId, TileStore};

/// Failure to recompress one tile. The tile is left as it was.
#[derive(Debug, Error)]
pub enum CompressError {
    #[error(transparent)]
    Tile(#[from] TileError),

    #[error("cannot decode {tile}: {source}")]
    Decode {
        tile: TileId,
        #[source]
        source: png::DecodingError,
    },

    #[error("cannot encode {tile}: {source}")]
    Encode {
        tile: TileId,
        #[source]
        source: png::EncodingError,
    },
}

/// Result of recompressing a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOutcome {
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl CompressOutcome {
    /// Whether the tile was replaced by a smaller encoding.
    pub fn shrunk(&self) -> bool {
        self.bytes_after < self.bytes_before
    }
}

/// Aggregate results of a compression pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionStats {
    /// Tiles rewritten with a smaller encoding
    pub compressed: usize,
    /// Tiles already at their best encoding
    pub unchanged: usize,
    /// Tiles that could not be processed
    pub failed: usize,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl CompressionStats {
    /// Folds one tile's outcome into the totals.
    pub fn record(&mut self, outcome: &Result<CompressOutcome, CompressError>) {
        match outcome {
            Ok(o) => {
                if o.shrunk() {
                    self.compressed += 1;
                } else {
                    self.unchanged += 1;
                }
                self.bytes_before += o.bytes_before;
                self.bytes_after += o.bytes_after;
            }
            Err(_) => self.failed += 1,
        }
    }

    /// Bytes saved across all processed tiles.
    pub fn saved(&self) -> u64 {
        self.bytes_before.saturating_sub(self.bytes_after)
    }
}

/// Recompresses a tile in place.
///
/// The file is only replaced when the new encoding is smaller. Either way
/// its modification time is unchanged.
pub fn compress_tile(store: &TileStore, id: &TileId) -> Result<CompressOutcome, CompressError> {
    let original = store.read(id)?;
    let modified = store.modified(id)?;

    let encoded = reencode(&original, id)?;
    let outcome = CompressOutcome {
        bytes_before: original.len() as u64,
        bytes_after: encoded.len().min(original.len()) as u64,
    };

    if encoded.len() < original.len() {
        match modified {
            Some(stamp) => store.write_stamped(id, &encoded, stamp)?,
            None => store.write(id, &encoded)?,
        }
    }

    Ok(outcome)
}

fn reencode(bytes: &[u8], id: &TileId) -> Result<Vec<u8>, CompressError> {
    let decode_err = |source: png::DecodingError| CompressError::Decode { tile: *id, source };
    let encode_err = |source: png::EncodingError| CompressError::Encode { tile: *id, source };

    let mut decoder = Decoder::new(bytes);
    decoder.set_transformations(Transformations::IDENTITY);
    let mut reader = decoder.read_info().map_err(decode_err)?;
    let mut pixels = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut pixels).map_err(decode_err)?;
    pixels.truncate(frame.buffer_size());

    let info = reader.info();
    let palette = info.palette.as_ref().map(|p| p.to_vec());
    let trns = info.trns.as_ref().map(|t| t.to_vec());

    let mut output = Vec::new();
    {
        let mut encoder = Encoder::new(&mut output, frame.width, frame.height);
        encoder.set_color(frame.color_type);
        encoder.set_depth(frame.bit_depth);
        if let Some(palette) = palette {
            encoder.set_palette(palette);
        }
        if let Some(trns) = trns {
            encoder.set_trns(trns);
        }
        encoder.set_compression(Compression::Best);
        encoder.set_adaptive_filter(AdaptiveFilterType::Adaptive);

        let mut writer = encoder.write_header().map_err(encode_err)?;
        writer.write_image_data(&pixels).map_err(encode_err)?;
        writer.finish().map_err(encode_err)?;
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::encode_rgba;
    use crate::grid::TilePosition;
    use crate::placeholder::BilevelImage;
    use crate::tile::{Layer, Timestamp};
    use image::{Rgba, RgbaImage};

    fn tile() -> TileId {
        TileId::new(Layer::Images, 2, TilePosition::new(1, 3))
    }

    fn gradient() -> RgbaImage {
        RgbaImage::from_fn(64, 64, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, 0, 255]))
    }

    #[test]
    fn test_rgba_content_is_preserved() {
        let temp = tempfile::tempdir().unwrap();
        let store = TileStore::new(temp.path());
        let image = gradient();
        store.write(&tile(), &encode_rgba(&image).unwrap()).unwrap();

        let outcome = compress_tile(&store, &tile()).unwrap();

        assert!(outcome.bytes_after <= outcome.bytes_before);
        let decoded = image::load_from_memory(&store.read(&tile()).unwrap())
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_modification_time_is_preserved() {
        let temp = tempfile::tempdir().unwrap();
        let store = TileStore::new(temp.path());
        let stamp = Timestamp::from_secs(1_700_000_000);
        let bytes = encode_rgba(&gradient()).unwrap();
        store.write_stamped(&tile(), &bytes, stamp).unwrap();

        compress_tile(&store, &tile()).unwrap();

        assert_eq!(store.modified(&tile()).unwrap(), Some(stamp));
    }

    #[test]
    fn test_indexed_tile_stays_one_bit() {
        let temp = tempfile::tempdir().unwrap();
        let store = TileStore::new(temp.path());
        let bilevel = BilevelImage::from_fn(40, 40, |x, y| (x + y) % 3 == 0);
        store
            .write(&tile(), &bilevel.encode_png(Compression::Fast).unwrap())
            .unwrap();

        compress_tile(&store, &tile()).unwrap();

        let bytes = store.read(&tile()).unwrap();
        let mut decoder = Decoder::new(bytes.as_slice());
        decoder.set_transformations(Transformations::IDENTITY);
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().color_type, png::ColorType::Indexed);
        assert_eq!(reader.info().bit_depth, png::BitDepth::One);
        assert_eq!(reader.info().trns.as_deref(), Some(&[0u8][..]));

        let rgba = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(rgba.get_pixel(1, 0)[3], 0);
    }

    #[test]
    fn test_corrupt_tile_is_error_and_untouched() {
        let temp = tempfile::tempdir().unwrap();
        let store = TileStore::new(temp.path());
        store.write(&tile(), b"garbage").unwrap();

        let err = compress_tile(&store, &tile()).unwrap_err();

        assert!(matches!(err, CompressError::Decode { .. }));
        assert_eq!(store.read(&tile()).unwrap(), b"garbage");
    }

    #[test]
    fn test_stats_record() {
        let mut stats = CompressionStats::default();
        stats.record(&Ok(CompressOutcome {
            bytes_before: 100,
            bytes_after: 60,
        }));
        stats.record(&Ok(CompressOutcome {
            bytes_before: 50,
            bytes_after: 50,
        }));
        stats.record(&Err(CompressError::Tile(TileError::MissingChild {
            parent: tile(),
            child: tile(),
        })));

        assert_eq!(stats.compressed, 1);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.saved(), 40);
    }
}
