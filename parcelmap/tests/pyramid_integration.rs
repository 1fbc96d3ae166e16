//! Integration tests for the incremental pyramid build.
//!
//! These tests run full and incremental builds against temporary output
//! roots and check the change sets, the files on disk and their contents:
//! - Totality of a full rebuild
//! - Idempotence of a repeated incremental build
//! - Change chains when a single parcel changes
//! - Deletion markers, unusable sources and future-dated sources
//!
//! Run with: `cargo test --test pyramid_integration`

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

use parcelmap::build::{BuildError, BuildOptions, BuildReport, PyramidBuilder};
use parcelmap::grid::{GridLayout, GridPosition, TilePosition};
use parcelmap::source::parcel_filename;
use parcelmap::tile::{Layer, TileId, Timestamp};

// ============================================================================
// Test Helpers
// ============================================================================

const TILE: u32 = 16;
const MAX_ZOOM: u8 = 3;

/// 4x4 parcels centred in an 8x8 leaf level.
fn layout() -> GridLayout {
    GridLayout::new(4, TILE, 0, MAX_ZOOM, 2.0).unwrap()
}

struct Workspace {
    _temp: TempDir,
    output: PathBuf,
    parcels: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("world");
        let parcels = temp.path().join("parcels");
        std::fs::create_dir_all(&parcels).unwrap();
        Self {
            _temp: temp,
            output,
            parcels,
        }
    }

    fn builder(&self) -> PyramidBuilder {
        self.builder_with(BuildOptions {
            parallel: true,
            threads: 2,
            compress: true,
        })
    }

    fn builder_with(&self, options: BuildOptions) -> PyramidBuilder {
        PyramidBuilder::new(layout(), &self.output, &self.parcels, options).unwrap()
    }

    fn builder_for(&self, layout: GridLayout) -> PyramidBuilder {
        PyramidBuilder::new(layout, &self.output, &self.parcels, BuildOptions::default()).unwrap()
    }

    /// Writes a solid black parcel and sets its modification time.
    fn add_parcel(&self, pos: GridPosition, modified: SystemTime) -> PathBuf {
        let image = RgbaImage::from_pixel(TILE, TILE, Rgba([0, 0, 0, 255]));
        self.save_parcel(pos, &image, modified)
    }

    fn save_parcel(&self, pos: GridPosition, image: &RgbaImage, modified: SystemTime) -> PathBuf {
        let path = self.parcels.join(parcel_filename(pos));
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
        Timestamp::new(modified).apply_to(&path).unwrap();
        path
    }

    fn tile_path(&self, id: &TileId) -> PathBuf {
        self.output
            .join(id.layer.dir_name())
            .join(id.zoom.to_string())
            .join(id.position.x.to_string())
            .join(format!("{}.png", id.position.y))
    }

    fn load_tile(&self, id: &TileId) -> RgbaImage {
        image::open(self.tile_path(id)).unwrap().to_rgba8()
    }

    fn load_placeholder(&self) -> RgbaImage {
        image::open(self.output.join("placeholder_tile.png"))
            .unwrap()
            .to_rgba8()
    }
}

fn ago(secs: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(secs)
}

/// Sets the modification time of every file under `dir`.
fn backdate(dir: &Path, to: SystemTime) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            backdate(&path, to);
        } else {
            Timestamp::new(to).apply_to(&path).unwrap();
        }
    }
}

/// The leaf of `pos` and all of its ancestors, leaf first.
fn chain(layer: Layer, pos: GridPosition) -> Vec<TileId> {
    let layout = layout();
    let mut tile = layout.to_tile_position(pos);
    let mut ids = Vec::new();
    for zoom in layout.zoom_levels().rev() {
        ids.push(TileId::new(layer, zoom, tile));
        tile = tile.parent();
    }
    ids
}

fn every_tile(layer: Layer) -> Vec<TileId> {
    let layout = layout();
    layout
        .zoom_levels()
        .flat_map(|z| {
            layout
                .tile_positions(z)
                .map(move |p| TileId::new(layer, z, p))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn changed(report: &BuildReport) -> Vec<TileId> {
    report.changes.iter().copied().collect()
}

// ============================================================================
// Full rebuild
// ============================================================================

#[test]
fn test_full_rebuild_without_sources_writes_every_tile() {
    let ws = Workspace::new();

    let report = ws.builder().rebuild().unwrap();

    assert_eq!(report.changes.count(Layer::Images), 85);
    assert_eq!(report.changes.count(Layer::Labels), 85);
    for layer in Layer::ALL {
        for id in every_tile(layer) {
            assert!(ws.tile_path(&id).is_file(), "{} missing", id);
        }
    }
    assert!(ws.output.join("placeholder_tile.png").is_file());
    assert_eq!(report.source_warnings, 0);
    let compression = report.compression.unwrap();
    assert_eq!(compression.failed, 0);
    assert_eq!(compression.compressed + compression.unchanged, 170);
}

#[test]
fn test_full_rebuild_reports_per_level_counts() {
    let ws = Workspace::new();

    let report = ws.builder().rebuild().unwrap();

    for (zoom, count) in [(3u8, 64usize), (2, 16), (1, 4), (0, 1)] {
        let stats = report.level(Layer::Images, zoom).unwrap();
        assert_eq!(stats.rebuilt, count, "images zoom {}", zoom);
        assert_eq!(stats.up_to_date, 0);
        assert_eq!(report.level(Layer::Labels, zoom).unwrap().rebuilt, count);
    }
}

#[test]
fn test_initialize_builds_only_labels() {
    let ws = Workspace::new();
    ws.add_parcel(GridPosition::new(1, 1), ago(600));

    let report = ws.builder().initialize().unwrap();

    assert_eq!(report.changes.count(Layer::Labels), 85);
    assert_eq!(report.changes.count(Layer::Images), 0);
    assert!(ws.output.join("placeholder_tile.png").is_file());
    assert!(!ws.output.join("images").exists());
    for id in every_tile(Layer::Labels) {
        assert!(ws.tile_path(&id).is_file(), "{} missing", id);
    }

    // The first incremental build fills the image layer
    let first = ws.builder().build().unwrap();
    assert_eq!(first.changes.count(Layer::Images), 85);
    assert_eq!(first.changes.count(Layer::Labels), 0);
}

#[test]
fn test_rebuild_clears_previous_output() {
    let ws = Workspace::new();
    std::fs::create_dir_all(ws.output.join("images/9")).unwrap();
    std::fs::write(ws.output.join("stale.txt"), "old").unwrap();

    ws.builder().rebuild().unwrap();

    assert!(!ws.output.join("stale.txt").exists());
    assert!(!ws.output.join("images/9").exists());
}

#[test]
fn test_rebuild_refuses_to_delete_sources() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("world");
    let parcels = output.join("parcels");
    std::fs::create_dir_all(&parcels).unwrap();

    let builder =
        PyramidBuilder::new(layout(), &output, &parcels, BuildOptions::default()).unwrap();
    let err = builder.rebuild().unwrap_err();

    assert!(matches!(err, BuildError::SourcesInsideOutput { .. }));
    assert!(parcels.is_dir());
}

// ============================================================================
// Incremental builds
// ============================================================================

#[test]
fn test_build_requires_initialized_root() {
    let ws = Workspace::new();

    let err = ws.builder().build().unwrap_err();
    assert!(matches!(err, BuildError::NotInitialized(_)));

    std::fs::create_dir_all(&ws.output).unwrap();
    let err = ws.builder().build().unwrap_err();
    assert!(matches!(err, BuildError::PlaceholderMissing(_)));
    assert!(!ws.output.join("images").exists(), "no tile work before the check");
}

#[test]
fn test_second_build_is_idempotent() {
    let ws = Workspace::new();
    ws.add_parcel(GridPosition::new(0, 0), ago(600));
    ws.add_parcel(GridPosition::new(2, 1), ago(600));

    ws.builder().rebuild().unwrap();
    let second = ws.builder().build().unwrap();
    let third = ws.builder().build().unwrap();

    assert!(second.is_up_to_date(), "changed: {:?}", changed(&second));
    assert!(third.is_up_to_date());
    assert_eq!(second.level(Layer::Images, MAX_ZOOM).unwrap().up_to_date, 64);
}

#[test]
fn test_new_source_changes_exactly_one_chain() {
    let ws = Workspace::new();
    ws.builder().rebuild().unwrap();
    backdate(&ws.output, ago(1000));

    let pos = GridPosition::new(1, 2);
    ws.add_parcel(pos, ago(500));
    let report = ws.builder().build().unwrap();

    // (max_zoom - min_zoom) + 1 tiles: the leaf and each of its ancestors
    assert_eq!(changed(&report), chain(Layer::Images, pos));
    assert_eq!(report.changes.count(Layer::Labels), 0);
}

#[test]
fn test_updated_source_reaches_root() {
    let ws = Workspace::new();
    let pos = GridPosition::new(3, 3);
    ws.add_parcel(pos, ago(2000));
    ws.builder().rebuild().unwrap();
    backdate(&ws.output, ago(1000));

    let white = RgbaImage::from_pixel(TILE, TILE, Rgba([255, 255, 255, 255]));
    ws.save_parcel(pos, &white, ago(500));
    let report = ws.builder().build().unwrap();

    let ids = changed(&report);
    assert_eq!(ids, chain(Layer::Images, pos));
    assert!(ids.contains(&TileId::new(Layer::Images, 0, TilePosition::new(0, 0))));
    // White parcels are transparent once reduced to one bit
    let leaf = ws.load_tile(&ids[0]);
    assert!(leaf.pixels().all(|p| p[3] == 0));
}

#[test]
fn test_unchanged_placeholder_leaves_are_not_rewritten() {
    let ws = Workspace::new();
    ws.builder().rebuild().unwrap();
    let leaf = TileId::new(Layer::Images, MAX_ZOOM, TilePosition::new(0, 0));
    let before = std::fs::metadata(ws.tile_path(&leaf)).unwrap().modified().unwrap();

    ws.builder().build().unwrap();

    let after = std::fs::metadata(ws.tile_path(&leaf)).unwrap().modified().unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_deleted_leaf_is_restored() {
    let ws = Workspace::new();
    ws.builder().rebuild().unwrap();
    let leaf = TileId::new(Layer::Images, MAX_ZOOM, TilePosition::new(7, 7));
    std::fs::remove_file(ws.tile_path(&leaf)).unwrap();

    let report = ws.builder().build().unwrap();

    assert!(report.changes.contains(&leaf));
    assert!(ws.tile_path(&leaf).is_file());
}

// ============================================================================
// Source handling
// ============================================================================

#[test]
fn test_parcel_content_reaches_leaf_and_parents() {
    let ws = Workspace::new();
    let pos = GridPosition::new(0, 0);
    ws.add_parcel(pos, ago(600));

    ws.builder().rebuild().unwrap();

    let ids = chain(Layer::Images, pos);
    let leaf = ws.load_tile(&ids[0]);
    assert!(leaf.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    // One black quadrant in the parent
    let parent = ws.load_tile(&ids[1]);
    let opaque = parent.pixels().filter(|p| p[3] > 128).count();
    assert!(opaque > 0 && opaque < (TILE * TILE) as usize);
}

#[test]
fn test_placeholders_absorb_into_transparent_parents() {
    let ws = Workspace::new();

    ws.builder().rebuild().unwrap();

    for id in every_tile(Layer::Images) {
        let tile = ws.load_tile(&id);
        assert_eq!(tile.dimensions(), (TILE, TILE));
        assert!(tile.pixels().all(|p| p[3] == 0), "{} is not transparent", id);
    }
}

#[test]
fn test_deletion_marker_blanks_leaf() {
    let ws = Workspace::new();
    let pos = GridPosition::new(2, 2);
    ws.add_parcel(pos, ago(2000));
    ws.builder().rebuild().unwrap();
    backdate(&ws.output, ago(1000));

    let marker = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
    ws.save_parcel(pos, &marker, ago(500));
    let report = ws.builder().build().unwrap();

    assert_eq!(changed(&report), chain(Layer::Images, pos));
    assert_eq!(report.source_warnings, 0);
    let leaf = ws.load_tile(&chain(Layer::Images, pos)[0]);
    assert_eq!(leaf.dimensions(), (TILE, TILE));
    assert!(leaf.pixels().all(|p| p[3] == 0));

    assert!(ws.builder().build().unwrap().is_up_to_date());
}

#[test]
fn test_unusable_source_is_blank_with_warning() {
    let ws = Workspace::new();
    let bad = ws.parcels.join("tile-B2.png");
    std::fs::write(&bad, b"this is not a png").unwrap();
    Timestamp::new(ago(600)).apply_to(&bad).unwrap();
    let wrong_size = RgbaImage::from_pixel(TILE * 2, TILE, Rgba([0, 0, 0, 255]));
    ws.save_parcel(GridPosition::new(0, 3), &wrong_size, ago(600));

    let report = ws.builder().rebuild().unwrap();

    assert_eq!(report.source_warnings, 2);
    let leaf = ws.load_tile(&chain(Layer::Images, GridPosition::new(1, 1))[0]);
    assert!(leaf.pixels().all(|p| p[3] == 0));

    let again = ws.builder().build().unwrap();
    assert!(again.is_up_to_date());
    assert_eq!(again.source_warnings, 0);
}

#[test]
fn test_future_dated_source_is_rebuilt_every_run() {
    let ws = Workspace::new();
    let pos = GridPosition::new(1, 1);
    let future = SystemTime::now() + Duration::from_secs(3600);
    ws.add_parcel(pos, future);

    ws.builder().rebuild().unwrap();
    let again = ws.builder().build().unwrap();

    assert_eq!(changed(&again), chain(Layer::Images, pos));
    let leaf = chain(Layer::Images, pos)[0];
    let leaf_time = std::fs::metadata(ws.tile_path(&leaf)).unwrap().modified().unwrap();
    assert!(leaf_time < future, "tiles are never stamped into the future");
}

#[test]
fn test_sibling_of_future_dated_source_propagates() {
    let ws = Workspace::new();
    let future_pos = GridPosition::new(0, 0);
    let sibling = GridPosition::new(0, 1);
    assert_eq!(
        chain(Layer::Images, future_pos)[1],
        chain(Layer::Images, sibling)[1],
        "both parcels share a parent"
    );
    ws.add_parcel(future_pos, SystemTime::now() + Duration::from_secs(3600));
    ws.builder().rebuild().unwrap();

    ws.add_parcel(sibling, SystemTime::now());
    let report = ws.builder().build().unwrap();

    for id in chain(Layer::Images, sibling) {
        assert!(report.changes.contains(&id), "{} not rebuilt", id);
    }
    // Two leaves and their shared ancestors
    assert_eq!(report.changes.count(Layer::Images), 5);
    let parent = ws.load_tile(&chain(Layer::Images, sibling)[1]);
    let opaque = parent.pixels().filter(|p| p[3] > 128).count();
    assert!(opaque >= 2 * 7 * 7, "both quadrants are inked");
}

#[test]
fn test_unrelated_files_are_ignored() {
    let ws = Workspace::new();
    std::fs::write(ws.parcels.join("README.md"), "notes").unwrap();
    std::fs::write(ws.parcels.join("tile-Z9.png"), "outside the grid").unwrap();

    let report = ws.builder().rebuild().unwrap();

    assert_eq!(report.source_warnings, 0);
}

// ============================================================================
// Label layer
// ============================================================================

#[test]
fn test_labels_only_on_claimable_leaves() {
    let ws = Workspace::new();
    ws.builder().rebuild().unwrap();
    let layout = layout();

    // Radius 2 around (1.5, 1.5): everything but the four corners
    let centre = ws.load_tile(&chain(Layer::Labels, GridPosition::new(1, 1))[0]);
    assert!(centre.pixels().any(|p| p[0] == 255 && p[1] == 0 && p[3] > 0));

    let corner = chain(Layer::Labels, GridPosition::new(0, 0))[0];
    assert!(!layout.is_claimable(GridPosition::new(0, 0)));
    assert_eq!(ws.load_tile(&corner), ws.load_placeholder());
}

#[test]
fn test_incremental_build_leaves_labels_alone() {
    let ws = Workspace::new();
    ws.builder().rebuild().unwrap();
    ws.add_parcel(GridPosition::new(0, 1), SystemTime::now());

    let report = ws.builder().build().unwrap();

    assert_eq!(report.changes.count(Layer::Labels), 0);
    let leaves = report.level(Layer::Labels, MAX_ZOOM).unwrap();
    assert_eq!((leaves.rebuilt, leaves.up_to_date), (0, 64));
}

#[test]
fn test_build_restores_missing_label_tiles() {
    let ws = Workspace::new();
    ws.builder().rebuild().unwrap();
    let pos = GridPosition::new(2, 1);
    let labels = chain(Layer::Labels, pos);
    assert_eq!(labels[0], TileId::new(Layer::Labels, 3, TilePosition::new(3, 3)));
    assert_eq!(labels[2], TileId::new(Layer::Labels, 1, TilePosition::new(0, 0)));
    std::fs::remove_file(ws.tile_path(&labels[0])).unwrap();
    std::fs::remove_file(ws.tile_path(&labels[2])).unwrap();

    let report = ws.builder().build().unwrap();

    let relabelled: Vec<TileId> = changed(&report)
        .into_iter()
        .filter(|id| id.layer == Layer::Labels)
        .collect();
    assert_eq!(relabelled, labels);
    for id in every_tile(Layer::Labels) {
        assert!(ws.tile_path(&id).is_file(), "{} missing", id);
    }
    let leaf = ws.load_tile(&labels[0]);
    assert!(leaf.pixels().any(|p| p[0] == 255 && p[1] == 0 && p[3] > 0));

    assert!(ws.builder().build().unwrap().is_up_to_date());
}

#[test]
fn test_single_claimable_parcel_is_the_only_label() {
    let ws = Workspace::new();
    // 3x3 parcels, only the centre parcel B2 lies within radius 0
    let layout = GridLayout::new(3, TILE, 0, MAX_ZOOM, 0.0).unwrap();
    let centre = layout.to_tile_position(GridPosition::new(1, 1));
    ws.builder_for(layout.clone()).rebuild().unwrap();

    let placeholder = ws.load_placeholder();
    let mut marked = Vec::new();
    for pos in layout.tile_positions(MAX_ZOOM) {
        let tile = ws.load_tile(&TileId::new(Layer::Labels, MAX_ZOOM, pos));
        if tile != placeholder {
            assert!(tile.pixels().any(|p| p[0] == 255 && p[1] == 0 && p[3] > 0));
            marked.push(pos);
        }
    }

    assert_eq!(marked, vec![centre]);
    assert_eq!(centre, TilePosition::new(3, 3));
}

// ============================================================================
// Scheduling
// ============================================================================

#[test]
fn test_sequential_and_parallel_builds_agree() {
    let sequential = Workspace::new();
    let parallel = Workspace::new();
    for ws in [&sequential, &parallel] {
        ws.add_parcel(GridPosition::new(0, 0), ago(600));
        ws.add_parcel(GridPosition::new(3, 2), ago(600));
    }

    let options = BuildOptions {
        parallel: false,
        threads: 0,
        compress: false,
    };
    let a = sequential.builder_with(options).rebuild().unwrap();
    let b = parallel.builder().rebuild().unwrap();

    assert_eq!(changed(&a), changed(&b));
    assert!(a.compression.is_none());
    for id in chain(Layer::Images, GridPosition::new(3, 2)) {
        assert_eq!(sequential.load_tile(&id), parallel.load_tile(&id));
    }
}
