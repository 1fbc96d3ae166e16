//! parcelmap - incremental tile pyramids for a parcel grid
//!
//! This library maintains a zoomable "slippy map" image pyramid assembled from
//! square parcel images on a fixed grid. Builds are incremental: file
//! modification times decide which tiles are stale, and only those are
//! regenerated.
//!
//! # High-Level API
//!
//! [`build::PyramidBuilder`] runs full and incremental builds:
//!
//! ```no_run
//! use parcelmap::build::PyramidBuilder;
//! use parcelmap::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let builder = PyramidBuilder::new(
//!     config.layout()?,
//!     &config.paths.output_dir,
//!     &config.paths.parcels_dir,
//!     config.build_options(),
//! )?;
//!
//! let report = builder.build()?;
//! if report.is_up_to_date() {
//!     println!("nothing to do");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod build;
pub mod claims;
pub mod compose;
pub mod compress;
pub mod config;
pub mod grid;
pub mod label;
pub mod logging;
pub mod placeholder;
pub mod provider;
pub mod source;
pub mod tile;

/// Version of the parcelmap library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
