//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[paths]
; Directory containing parcel sources named tile-{{ROW}}{{COL}}.png, e.g. tile-H4.png
parcels_dir = {}
; Output root. Tiles are written to <output_dir>/<layer>/<zoom>/<x>/<y>.png
; WARNING: a full rebuild deletes everything in this directory
output_dir = {}

[grid]
; Parcels along each side of the square grid
grid_size = {}
; Edge length of every tile in pixels
tile_size = {}
; Coarsest zoom level (a single tile at zoom 0)
min_zoom = {}
; Leaf zoom level; the grid is centred in its 2^max_zoom x 2^max_zoom tiles
max_zoom = {}
; Parcels within this distance of the grid centre can be claimed (grid units)
claim_radius = {}

[build]
; Process the tiles of each zoom level in parallel
parallel = {}
; Worker threads for parallel builds (0 = one per core)
threads = {}
; Re-encode changed tiles with maximum lossless compression
compress = {}

[logging]
; Directory for the log file
directory = {}
; Log file name
file = {}
"#,
        path_to_string(&config.paths.parcels_dir),
        path_to_string(&config.paths.output_dir),
        config.grid.grid_size,
        config.grid.tile_size,
        config.grid.min_zoom,
        config.grid.max_zoom,
        config.grid.claim_radius,
        config.build.parallel,
        config.build.threads,
        config.build.compress,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
