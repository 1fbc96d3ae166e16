//! Change tracking for a single build invocation.

use crate::tile::{Layer, TileId};

/// Append-only record of the tiles written during one build.
///
/// Tiles appear in the order they were settled: leaves first, then each
/// coarser level in turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    tiles: Vec<TileId>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: TileId) {
        self.tiles.push(id);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, id: &TileId) -> bool {
        self.tiles.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileId> {
        self.tiles.iter()
    }

    pub fn as_slice(&self) -> &[TileId] {
        &self.tiles
    }

    /// Number of changed tiles in `layer`.
    pub fn count(&self, layer: Layer) -> usize {
        self.tiles.iter().filter(|id| id.layer == layer).count()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a TileId;
    type IntoIter = std::slice::Iter<'a, TileId>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}
