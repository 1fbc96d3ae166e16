//! Grid and tile position types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::address::{row_index, row_letters};

/// Largest supported maximum zoom level (4096×4096 leaves).
pub const MAX_SUPPORTED_ZOOM: u8 = 12;

/// Default number of parcels along each side of the logical grid.
pub const DEFAULT_GRID_SIZE: u32 = 38;

/// Default edge length of every tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 500;

/// Default zoom level of the coarsest tile (a single tile covering the world).
pub const DEFAULT_MIN_ZOOM: u8 = 0;

/// Default zoom level at which parcels map 1:1 onto tiles.
pub const DEFAULT_MAX_ZOOM: u8 = 6;

/// Default claim radius in grid units, measured from the grid center.
pub const DEFAULT_CLAIM_RADIUS: f64 = 19.0;

/// A position on the logical parcel grid.
///
/// Rows and columns are 0-based. Row 0 is the "A" row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPosition {
    /// Row index (0 = A)
    pub row: u32,
    /// Column index (0 = column 1)
    pub col: u32,
}

impl GridPosition {
    /// Creates a grid position from 0-based row and column indices.
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Returns the human-readable parcel address, e.g. `H4` or `AL38`.
    ///
    /// The column part is 1-based.
    pub fn address(&self) -> String {
        format!("{}{}", row_letters(self.row), self.col + 1)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

/// Error returned when a parcel address cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid parcel address '{0}' (expected row letters followed by a 1-based column, e.g. H4)")]
pub struct AddressParseError(pub String);

impl FromStr for GridPosition {
    type Err = AddressParseError;

    /// Parses an address like `H4` or `al38` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| AddressParseError(s.to_string()))?;
        let (letters, digits) = s.split_at(split);

        let row = row_index(letters).ok_or_else(|| AddressParseError(s.to_string()))?;
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(AddressParseError(s.to_string()));
        }
        let col: u32 = digits
            .parse()
            .map_err(|_| AddressParseError(s.to_string()))?;
        if col == 0 {
            return Err(AddressParseError(s.to_string()));
        }

        Ok(GridPosition::new(row, col - 1))
    }
}

/// A tile position within one zoom level of the quadtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePosition {
    /// X coordinate (west to east)
    pub x: u32,
    /// Y coordinate (north to south)
    pub y: u32,
}

impl TilePosition {
    /// Creates a tile position.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The four children at the next finer zoom level.
    ///
    /// Order: top-left, top-right, bottom-left, bottom-right.
    pub fn children(&self) -> [TilePosition; 4] {
        let (x, y) = (self.x * 2, self.y * 2);
        [
            TilePosition::new(x, y),
            TilePosition::new(x + 1, y),
            TilePosition::new(x, y + 1),
            TilePosition::new(x + 1, y + 1),
        ]
    }

    /// The parent at the next coarser zoom level.
    pub fn parent(&self) -> TilePosition {
        TilePosition::new(self.x / 2, self.y / 2)
    }
}

impl fmt::Display for TilePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.x, self.y)
    }
}

/// Errors raised when a grid layout is inconsistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Minimum zoom is above maximum zoom
    #[error("min_zoom {min} is greater than max_zoom {max}")]
    ZoomRange { min: u8, max: u8 },

    /// Maximum zoom exceeds the supported range
    #[error("max_zoom {0} exceeds the supported maximum of {max}", max = MAX_SUPPORTED_ZOOM)]
    ZoomTooLarge(u8),

    /// The grid does not fit in the leaf level
    #[error("grid of {grid_size}x{grid_size} parcels does not fit in {capacity}x{capacity} leaf tiles")]
    GridTooLarge { grid_size: u32, capacity: u32 },

    /// The grid has no parcels
    #[error("grid_size must be at least 1")]
    EmptyGrid,

    /// Tiles have no pixels
    #[error("tile_size must be at least 1 pixel")]
    ZeroTileSize,

    /// Claim radius is negative or not a number
    #[error("claim_radius must be a non-negative number (got {0})")]
    InvalidRadius(f64),
}
