//! Leaf providers: how each layer obtains its max-zoom tiles.
//!
//! The pyramid machinery is the same for every layer. A [`LeafProvider`]
//! supplies the layer-specific parts: what a leaf depends on and how to
//! produce its content.

mod label;
mod parcel;

pub use label::LabelLeafProvider;
pub use parcel::ImageLeafProvider;

use std::path::PathBuf;

use thiserror::Error;

use crate::grid::TilePosition;
use crate::source::SourceError;
use crate::tile::{Layer, TileError, Timestamp};

/// What a leaf's content depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafRequirement {
    /// No content; the leaf is a copy of the placeholder asset
    Placeholder,
    /// Converted from an external source file
    Source { path: PathBuf, modified: Timestamp },
    /// Produced from grid coordinates alone, with no external input
    Generated,
}

/// Content produced for a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafContent {
    /// Copy of the placeholder asset carrying its timestamp
    Placeholder,
    /// Placeholder pixels written as a new file with a fresh timestamp
    Blank,
    /// An encoded PNG tile
    Png(Vec<u8>),
}

/// Failure to produce a leaf.
#[derive(Debug, Error)]
pub enum LeafError {
    /// The source is unusable; the leaf is written blank and the build continues
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Content could not be produced; the build fails
    #[error(transparent)]
    Tile(#[from] TileError),
}

/// Supplies the max-zoom tiles of one layer.
pub trait LeafProvider: Send + Sync {
    /// The layer whose leaves this provider produces.
    fn layer(&self) -> Layer;

    /// What the leaf at `leaf` depends on.
    fn requirement(&self, leaf: TilePosition) -> LeafRequirement;

    /// Produces the content for `leaf` given its requirement.
    fn generate(
        &self,
        leaf: TilePosition,
        requirement: &LeafRequirement,
    ) -> Result<LeafContent, LeafError>;
}
