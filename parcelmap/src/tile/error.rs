//! Error types for tile storage and image codecs.

use std::path::PathBuf;

use thiserror::Error;

use super::TileId;

/// Errors raised while reading, writing or compositing a tile.
#[derive(Debug, Error)]
pub enum TileError {
    /// Filesystem operation on a tile path failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored tile could not be decoded
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// Tile pixels could not be encoded
    #[error("failed to encode {tile}: {reason}")]
    Encode { tile: TileId, reason: String },

    /// A child required for compositing is absent
    #[error("child tile {child} of {parent} is missing")]
    MissingChild { parent: TileId, child: TileId },
}

impl TileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TileError::Io {
            path: path.into(),
            source,
        }
    }
}
