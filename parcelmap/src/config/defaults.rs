//! Default values for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::grid::{
    DEFAULT_CLAIM_RADIUS, DEFAULT_GRID_SIZE, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM,
    DEFAULT_TILE_SIZE,
};

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "parcelmap.ini";

/// Default parcel source directory.
pub const DEFAULT_PARCELS_DIR: &str = "parcels";

/// Default output root.
pub const DEFAULT_OUTPUT_DIR: &str = "docs/world";

/// Default log directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "parcelmap.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            paths: PathSettings {
                parcels_dir: PathBuf::from(DEFAULT_PARCELS_DIR),
                output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            },
            grid: GridSettings {
                grid_size: DEFAULT_GRID_SIZE,
                tile_size: DEFAULT_TILE_SIZE,
                min_zoom: DEFAULT_MIN_ZOOM,
                max_zoom: DEFAULT_MAX_ZOOM,
                claim_radius: DEFAULT_CLAIM_RADIUS,
            },
            build: BuildSettings {
                parallel: true,
                threads: 0,
                compress: true,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIR),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
