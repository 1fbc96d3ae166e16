//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;

use crate::build::BuildOptions;
use crate::grid::{GridLayout, LayoutError};

/// Complete configuration loaded from `parcelmap.ini`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Input and output locations
    pub paths: PathSettings,
    /// Grid and pyramid shape
    pub grid: GridSettings,
    /// Build behaviour
    pub build: BuildSettings,
    /// Log file location
    pub logging: LoggingSettings,
}

/// `[paths]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSettings {
    /// Directory holding `tile-{ADDRESS}.png` sources
    pub parcels_dir: PathBuf,
    /// Output root holding the tile pyramids
    pub output_dir: PathBuf,
}

/// `[grid]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    pub grid_size: u32,
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub claim_radius: f64,
}

/// `[build]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    /// Process tiles within a zoom level in parallel
    pub parallel: bool,
    /// Worker threads (0 = one per core)
    pub threads: usize,
    /// Recompress changed tiles after each build
    pub compress: bool,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for the log file
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}

impl ConfigFile {
    /// The grid layout described by the `[grid]` section.
    pub fn layout(&self) -> Result<GridLayout, LayoutError> {
        GridLayout::new(
            self.grid.grid_size,
            self.grid.tile_size,
            self.grid.min_zoom,
            self.grid.max_zoom,
            self.grid.claim_radius,
        )
    }

    /// Build options described by the `[build]` section.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            parallel: self.build.parallel,
            threads: self.build.threads,
            compress: self.build.compress,
        }
    }
}
