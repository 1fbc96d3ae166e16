//! Grid mapping between parcel addresses and leaf tiles.
//!
//! The world is a `G×G` grid of parcels centered inside the `2^Z×2^Z` leaf
//! level of a slippy-map quadtree. Row 0 (`A`) sits at the bottom of the
//! world, so the vertical axis is inverted when mapping to tile `y`:
//!
//! ```text
//! x = col + offset
//! y = offset + (G - 1) - row
//! offset = (2^Z - G) / 2
//! ```

mod address;
mod types;


pub use address::{row_index, row_letters};
pub use types::{
    AddressParseError, GridPosition, LayoutError, TilePosition, DEFAULT_CLAIM_RADIUS,
    DEFAULT_GRID_SIZE, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_TILE_SIZE, MAX_SUPPORTED_ZOOM,
};

use std::ops::RangeInclusive;

/// Shape of the parcel grid and the tile pyramid built on top of it.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    grid_size: u32,
    tile_size: u32,
    min_zoom: u8,
    max_zoom: u8,
    claim_radius: f64,
}

impl GridLayout {
    /// Creates a validated layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if the zoom range is inverted or too deep, the
    /// grid does not fit in the leaf level, or a size or radius is invalid.
    pub fn new(
        grid_size: u32,
        tile_size: u32,
        min_zoom: u8,
        max_zoom: u8,
        claim_radius: f64,
    ) -> Result<Self, LayoutError> {
        if min_zoom > max_zoom {
            return Err(LayoutError::ZoomRange {
                min: min_zoom,
                max: max_zoom,
            });
        }
        if max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(LayoutError::ZoomTooLarge(max_zoom));
        }
        if grid_size == 0 {
            return Err(LayoutError::EmptyGrid);
        }
        let capacity = 1u32 << max_zoom;
        if grid_size > capacity {
            return Err(LayoutError::GridTooLarge {
                grid_size,
                capacity,
            });
        }
        if tile_size == 0 {
            return Err(LayoutError::ZeroTileSize);
        }
        if claim_radius.is_nan() || claim_radius < 0.0 {
            return Err(LayoutError::InvalidRadius(claim_radius));
        }

        Ok(Self {
            grid_size,
            tile_size,
            min_zoom,
            max_zoom,
            claim_radius,
        })
    }

    /// Number of parcels along each side of the grid.
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Edge length of every tile in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Coarsest zoom level.
    pub fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    /// Leaf zoom level.
    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    /// Claim radius in grid units.
    pub fn claim_radius(&self) -> f64 {
        self.claim_radius
    }

    /// All zoom levels, coarsest first.
    pub fn zoom_levels(&self) -> RangeInclusive<u8> {
        self.min_zoom..=self.max_zoom
    }

    /// Number of tiles along each side at `zoom`.
    pub fn tiles_per_side(&self, zoom: u8) -> u32 {
        1u32 << zoom
    }

    /// Total number of tiles at `zoom`.
    pub fn tile_count(&self, zoom: u8) -> usize {
        let side = self.tiles_per_side(zoom) as usize;
        side * side
    }

    /// Total number of tiles in one layer across all zoom levels.
    pub fn total_tile_count(&self) -> usize {
        self.zoom_levels().map(|z| self.tile_count(z)).sum()
    }

    /// Offset that centers the grid inside the leaf level.
    pub fn offset(&self) -> u32 {
        (self.tiles_per_side(self.max_zoom) - self.grid_size) / 2
    }

    /// Whether `pos` lies inside the logical grid.
    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.row < self.grid_size && pos.col < self.grid_size
    }

    /// Maps a grid position to its leaf tile position.
    ///
    /// Total and injective over the positions for which [`contains`] holds.
    ///
    /// [`contains`]: GridLayout::contains
    pub fn to_tile_position(&self, pos: GridPosition) -> TilePosition {
        debug_assert!(self.contains(pos), "grid position {:?} outside grid", pos);
        let offset = self.offset();
        TilePosition::new(
            pos.col + offset,
            offset + (self.grid_size - 1) - pos.row,
        )
    }

    /// Maps a leaf tile position back to a grid position.
    ///
    /// Returns `None` for leaves outside the centered grid; those leaves are
    /// always placeholders.
    pub fn to_grid_position(&self, tile: TilePosition) -> Option<GridPosition> {
        let offset = self.offset();
        let col = tile.x.checked_sub(offset)?;
        let flipped = tile.y.checked_sub(offset)?;
        if col >= self.grid_size || flipped >= self.grid_size {
            return None;
        }
        Some(GridPosition::new(self.grid_size - 1 - flipped, col))
    }

    /// Whether a parcel is within the claim radius of the grid center.
    ///
    /// Positions exactly on the radius are claimable. Positions outside the
    /// grid never are.
    pub fn is_claimable(&self, pos: GridPosition) -> bool {
        if !self.contains(pos) {
            return false;
        }
        // Doubled coordinates keep the center ((G-1)/2) on the integer lattice.
        let span = self.grid_size as i64 - 1;
        let dr = (2 * pos.row as i64 - span) as f64;
        let dc = (2 * pos.col as i64 - span) as f64;
        let diameter = 2.0 * self.claim_radius;
        dr * dr + dc * dc <= diameter * diameter
    }

    /// Every grid position in row-major order.
    pub fn grid_positions(&self) -> impl Iterator<Item = GridPosition> {
        let size = self.grid_size;
        (0..size).flat_map(move |row| (0..size).map(move |col| GridPosition::new(row, col)))
    }

    /// Every claimable grid position in row-major order.
    pub fn claimable_positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.grid_positions().filter(|pos| self.is_claimable(*pos))
    }

    /// Every tile position at `zoom`, column by column.
    pub fn tile_positions(&self, zoom: u8) -> impl Iterator<Item = TilePosition> {
        let side = self.tiles_per_side(zoom);
        (0..side).flat_map(move |x| (0..side).map(move |y| TilePosition::new(x, y)))
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            tile_size: DEFAULT_TILE_SIZE,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            claim_radius: DEFAULT_CLAIM_RADIUS,
        }
    }
}
