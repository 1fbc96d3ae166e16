//! Tile identity, storage and staleness.
//!
//! A tile is identified by its layer, zoom level and position. Tiles are
//! stored as PNG files under the output root:
//!
//! ```text
//! <root>/<layer>/<zoom>/<x>/<y>.png
//! <root>/placeholder_tile.png
//! ```

mod error;
mod store;
mod timestamp;

pub use error::TileError;
pub use store::{PlaceholderAsset, TileStore, PLACEHOLDER_FILENAME};
pub use timestamp::{is_stale, Timestamp};

use std::fmt;

use crate::grid::TilePosition;

/// One of the two pyramids maintained under the output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Parcel imagery, leaves converted from source files
    Images,
    /// Parcel borders and addresses, leaves generated from grid coordinates
    Labels,
}

impl Layer {
    /// Every layer, in build order.
    pub const ALL: [Layer; 2] = [Layer::Images, Layer::Labels];

    /// Directory name of the layer under the output root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Layer::Images => "images",
            Layer::Labels => "labels",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Identity of a single tile in a layer's pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub layer: Layer,
    pub zoom: u8,
    pub position: TilePosition,
}

impl TileId {
    /// Creates a tile identity.
    pub const fn new(layer: Layer, zoom: u8, position: TilePosition) -> Self {
        Self {
            layer,
            zoom,
            position,
        }
    }

    /// The four children one zoom level finer, in compositing order.
    pub fn children(&self) -> [TileId; 4] {
        self.position
            .children()
            .map(|p| TileId::new(self.layer, self.zoom + 1, p))
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.layer, self.zoom, self.position)
    }
}
