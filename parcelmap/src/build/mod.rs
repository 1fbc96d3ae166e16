//! The incremental pyramid build engine.
//!
//! A build settles one layer at a time, bottom-up:
//!
//! 1. **Leaves**: every max-zoom tile is compared with what it depends on
//!    (a source file, the placeholder, or nothing) and regenerated if stale.
//! 2. **Propagation**: each coarser level is rebuilt wherever a child is
//!    newer than its parent, down to the minimum zoom.
//! 3. **Compression**: every tile written in steps 1 and 2 is re-encoded with
//!    maximum lossless compression.
//!
//! File modification times are the only dependency signal. Tiles within a
//! level are independent and processed in parallel; levels are processed
//! strictly in order.
//!
//! # Example
//!
//! ```no_run
//! use parcelmap::build::{BuildOptions, PyramidBuilder};
//! use parcelmap::grid::GridLayout;
//!
//! let builder = PyramidBuilder::new(
//!     GridLayout::default(),
//!     "docs/world",
//!     "parcels",
//!     BuildOptions::default(),
//! )?;
//! let report = builder.rebuild()?;
//! println!("{} tiles written", report.rebuilt());
//! # Ok::<(), parcelmap::build::BuildError>(())
//! ```

mod changes;
mod error;
mod init;
mod leaves;
mod propagate;
mod report;

pub use changes::ChangeSet;
pub use error::BuildError;
pub use report::{BuildReport, LevelStats};

use std::path::PathBuf;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, warn};

use crate::compose::Compositor;
use crate::compress::{compress_tile, CompressionStats};
use crate::grid::GridLayout;
use crate::provider::{ImageLeafProvider, LabelLeafProvider, LeafProvider};
use crate::source::{ParcelDirectory, ParcelIndex};
use crate::tile::{PlaceholderAsset, TileStore};

/// Whether timestamps are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildPolicy {
    /// Regenerate only stale tiles
    Incremental,
    /// Regenerate every tile
    Always,
}

/// Tunables for a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Process the tiles of a level in parallel
    pub parallel: bool,
    /// Worker threads; 0 uses rayon's global pool
    pub threads: usize,
    /// Run the compression pass over changed tiles
    pub compress: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: 0,
            compress: true,
        }
    }
}

/// Runs per-tile work for one level, sequentially or on a rayon pool.
///
/// Results come back in input order regardless of scheduling.
struct LevelRunner {
    parallel: bool,
    pool: Option<ThreadPool>,
}

impl LevelRunner {
    fn new(options: &BuildOptions) -> Result<Self, BuildError> {
        let pool = if options.parallel && options.threads > 0 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(options.threads)
                    .thread_name(|i| format!("parcelmap-build-{}", i))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            parallel: options.parallel,
            pool,
        })
    }

    fn run<I, T, F>(&self, items: &[I], work: F) -> Vec<T>
    where
        I: Sync,
        T: Send,
        F: Fn(&I) -> T + Sync + Send,
    {
        if !self.parallel {
            return items.iter().map(work).collect();
        }
        match &self.pool {
            Some(pool) => pool.install(|| items.par_iter().map(&work).collect()),
            None => items.par_iter().map(work).collect(),
        }
    }
}

/// Builds and maintains the tile pyramids under an output root.
pub struct PyramidBuilder {
    layout: GridLayout,
    store: TileStore,
    parcels: ParcelDirectory,
    options: BuildOptions,
    compositor: Compositor,
    runner: LevelRunner,
}

impl PyramidBuilder {
    /// Creates a builder. Nothing is read or written until a build runs.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ThreadPool`] if a dedicated pool was requested
    /// and could not be started.
    pub fn new(
        layout: GridLayout,
        output_root: impl Into<PathBuf>,
        parcels_dir: impl Into<PathBuf>,
        options: BuildOptions,
    ) -> Result<Self, BuildError> {
        let runner = LevelRunner::new(&options)?;
        Ok(Self {
            compositor: Compositor::new(layout.tile_size()),
            store: TileStore::new(output_root),
            parcels: ParcelDirectory::new(parcels_dir),
            layout,
            options,
            runner,
        })
    }

    /// Full rebuild: initialization followed by one incremental image pass.
    pub fn rebuild(&self) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::new();
        let placeholder = self.initialize_into(&mut report)?;
        self.update_images(&placeholder, &mut report)?;
        self.compress_changes(&mut report);
        report.log_summary();
        Ok(report)
    }

    /// Incremental build against an initialized root.
    ///
    /// Brings the image layer up to date with the parcel directory, then
    /// restores any label tile that has gone missing. A healthy label layer
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Fails before touching any tile if the output root or the placeholder
    /// asset is missing, or the parcel directory cannot be listed.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let root = self.store.root();
        if !root.is_dir() {
            return Err(BuildError::NotInitialized(root.to_path_buf()));
        }
        let placeholder = self.load_placeholder()?;

        let mut report = BuildReport::new();
        self.update_images(&placeholder, &mut report)?;
        self.repair_labels(&placeholder, &mut report)?;
        self.compress_changes(&mut report);
        report.log_summary();
        Ok(report)
    }

    /// Scans the parcel directory.
    pub fn scan_parcels(&self) -> Result<ParcelIndex, BuildError> {
        self.parcels
            .scan(&self.layout)
            .map_err(|source| BuildError::Scan {
                path: self.parcels.path().to_path_buf(),
                source,
            })
    }

    fn load_placeholder(&self) -> Result<PlaceholderAsset, BuildError> {
        self.store
            .read_placeholder()?
            .ok_or_else(|| BuildError::PlaceholderMissing(self.store.placeholder_path()))
    }

    fn update_images(
        &self,
        placeholder: &PlaceholderAsset,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        let index = self.scan_parcels()?;
        info!(parcels = index.len(), "Updating image layer");

        let provider = ImageLeafProvider::new(&self.layout, &index);
        self.sync_leaves(&provider, placeholder, RebuildPolicy::Incremental, report)?;
        self.propagate(provider.layer(), RebuildPolicy::Incremental, report)
    }

    fn repair_labels(
        &self,
        placeholder: &PlaceholderAsset,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        let provider = LabelLeafProvider::new(&self.layout);
        self.sync_leaves(&provider, placeholder, RebuildPolicy::Incremental, report)?;
        self.propagate(provider.layer(), RebuildPolicy::Incremental, report)
    }

    fn compress_changes(&self, report: &mut BuildReport) {
        if !self.options.compress || report.changes.is_empty() {
            return;
        }
        info!(tiles = report.changes.len(), "Compressing changed tiles");

        let ids = report.changes.as_slice();
        let results = self.runner.run(ids, |id| compress_tile(&self.store, id));

        let mut stats = CompressionStats::default();
        for (id, result) in ids.iter().zip(&results) {
            if let Err(e) = result {
                warn!(tile = %id, error = %e, "Compression failed, keeping tile as written");
            }
            stats.record(result);
        }
        report.compression = Some(stats);
    }
}
