//! Label layer: leaves generated from grid coordinates.

use super::{LeafContent, LeafError, LeafProvider, LeafRequirement};
use crate::compose::encode_rgba;
use crate::grid::{GridLayout, TilePosition};
use crate::label::LabelRenderer;
use crate::tile::{Layer, TileError, TileId};

/// Produces a bordered address label for every claimable parcel.
///
/// Leaves have no external inputs, so they are only regenerated when missing
/// or when the whole layer is rebuilt.
pub struct LabelLeafProvider<'a> {
    layout: &'a GridLayout,
    renderer: LabelRenderer,
}

impl<'a> LabelLeafProvider<'a> {
    pub fn new(layout: &'a GridLayout) -> Self {
        Self {
            layout,
            renderer: LabelRenderer::new(layout.tile_size()),
        }
    }
}

impl LeafProvider for LabelLeafProvider<'_> {
    fn layer(&self) -> Layer {
        Layer::Labels
    }

    fn requirement(&self, leaf: TilePosition) -> LeafRequirement {
        match self.layout.to_grid_position(leaf) {
            Some(pos) if self.layout.is_claimable(pos) => LeafRequirement::Generated,
            _ => LeafRequirement::Placeholder,
        }
    }

    fn generate(
        &self,
        leaf: TilePosition,
        requirement: &LeafRequirement,
    ) -> Result<LeafContent, LeafError> {
        let Some(pos) = self.layout.to_grid_position(leaf) else {
            return Ok(LeafContent::Placeholder);
        };
        if *requirement != LeafRequirement::Generated {
            return Ok(LeafContent::Placeholder);
        }

        let tile = TileId::new(Layer::Labels, self.layout.max_zoom(), leaf);
        let image = self
            .renderer
            .render(&pos.address())
            .ok_or_else(|| TileError::Encode {
                tile,
                reason: "cannot allocate label canvas".to_string(),
            })?;
        let bytes = encode_rgba(&image).map_err(|e| TileError::Encode {
            tile,
            reason: e.to_string(),
        })?;
        Ok(LeafContent::Png(bytes))
    }
}
