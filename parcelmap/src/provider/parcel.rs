//! Image layer: leaves converted from parcel source files.

use png::Compression;

use super::{LeafContent, LeafError, LeafProvider, LeafRequirement};
use crate::grid::{GridLayout, TilePosition};
use crate::source::{load_source, ParcelIndex, SourceContent};
use crate::tile::{Layer, TileError, TileId};

/// Produces image leaves from a snapshot of the parcel directory.
pub struct ImageLeafProvider<'a> {
    layout: &'a GridLayout,
    index: &'a ParcelIndex,
}

impl<'a> ImageLeafProvider<'a> {
    pub fn new(layout: &'a GridLayout, index: &'a ParcelIndex) -> Self {
        Self { layout, index }
    }
}

impl LeafProvider for ImageLeafProvider<'_> {
    fn layer(&self) -> Layer {
        Layer::Images
    }

    fn requirement(&self, leaf: TilePosition) -> LeafRequirement {
        let source = self
            .layout
            .to_grid_position(leaf)
            .and_then(|pos| self.index.get(pos));

        match source {
            Some(file) => LeafRequirement::Source {
                path: file.path.clone(),
                modified: file.modified,
            },
            None => LeafRequirement::Placeholder,
        }
    }

    fn generate(
        &self,
        leaf: TilePosition,
        requirement: &LeafRequirement,
    ) -> Result<LeafContent, LeafError> {
        let LeafRequirement::Source { path, .. } = requirement else {
            return Ok(LeafContent::Placeholder);
        };

        match load_source(path, self.layout.tile_size())? {
            SourceContent::Parcel(parcel) => {
                let bytes = parcel.encode_png(Compression::Fast).map_err(|e| {
                    TileError::Encode {
                        tile: TileId::new(Layer::Images, self.layout.max_zoom(), leaf),
                        reason: e.to_string(),
                    }
                })?;
                Ok(LeafContent::Png(bytes))
            }
            SourceContent::DeletionMarker => Ok(LeafContent::Blank),
        }
    }
}
