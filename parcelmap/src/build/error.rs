//! Fatal build errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::tile::TileError;

/// Errors that abort a build.
///
/// Problems confined to a single source file or to compressing a single tile
/// are not errors; they are logged and counted in the build report.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Incremental build against an output root that was never initialized
    #[error("output directory {} does not exist; run a full rebuild first", .0.display())]
    NotInitialized(PathBuf),

    /// The placeholder asset is missing from an initialized root
    #[error("placeholder tile {} is missing; run a full rebuild first", .0.display())]
    PlaceholderMissing(PathBuf),

    /// Initialization would delete the parcel sources
    #[error(
        "refusing to clear {}: it contains the parcel directory {}",
        output.display(),
        parcels.display()
    )]
    SourcesInsideOutput { output: PathBuf, parcels: PathBuf },

    /// The output root could not be cleared or created
    #[error("cannot prepare output directory {}: {source}", path.display())]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parcel directory could not be listed
    #[error("cannot scan parcel directory {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The placeholder tile could not be encoded
    #[error("cannot encode placeholder tile: {0}")]
    Placeholder(#[source] png::EncodingError),

    /// The worker pool could not be started
    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Reading, writing or compositing a tile failed
    #[error(transparent)]
    Tile(#[from] TileError),
}
