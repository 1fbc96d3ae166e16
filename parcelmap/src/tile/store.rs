//! Filesystem layout of the tile pyramids.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{Layer, TileError, TileId, Timestamp};

/// Filename of the canonical placeholder tile under the output root.
pub const PLACEHOLDER_FILENAME: &str = "placeholder_tile.png";

/// The canonical placeholder tile as loaded at the start of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderAsset {
    pub bytes: Vec<u8>,
    pub modified: Timestamp,
}

/// Tile storage rooted at an output directory.
///
/// Every write goes to a temporary sibling file that is renamed over the
/// destination, so readers never observe a partially written tile.
#[derive(Debug, Clone)]
pub struct TileStore {
    root: PathBuf,
}

impl TileStore {
    /// Creates a store rooted at `root`. Nothing is touched on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the canonical placeholder tile.
    pub fn placeholder_path(&self) -> PathBuf {
        self.root.join(PLACEHOLDER_FILENAME)
    }

    /// Directory holding every tile of `layer`.
    pub fn layer_dir(&self, layer: Layer) -> PathBuf {
        self.root.join(layer.dir_name())
    }

    /// Path of a tile.
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use parcelmap::grid::TilePosition;
    /// use parcelmap::tile::{Layer, TileId, TileStore};
    ///
    /// let store = TileStore::new("/world");
    /// let id = TileId::new(Layer::Images, 6, TilePosition::new(13, 50));
    /// assert_eq!(store.tile_path(&id), PathBuf::from("/world/images/6/13/50.png"));
    /// ```
    pub fn tile_path(&self, id: &TileId) -> PathBuf {
        self.layer_dir(id.layer)
            .join(id.zoom.to_string())
            .join(id.position.x.to_string())
            .join(format!("{}.png", id.position.y))
    }

    /// Modification time of a tile, or `None` if it has not been written.
    pub fn modified(&self, id: &TileId) -> Result<Option<Timestamp>, TileError> {
        let path = self.tile_path(id);
        Timestamp::of_path(&path).map_err(|e| TileError::io(path, e))
    }

    /// Modification time of the placeholder, or `None` if it is missing.
    pub fn placeholder_modified(&self) -> Result<Option<Timestamp>, TileError> {
        let path = self.placeholder_path();
        Timestamp::of_path(&path).map_err(|e| TileError::io(path, e))
    }

    /// Reads the encoded bytes of a tile.
    pub fn read(&self, id: &TileId) -> Result<Vec<u8>, TileError> {
        let path = self.tile_path(id);
        std::fs::read(&path).map_err(|e| TileError::io(path, e))
    }

    /// Writes encoded tile bytes with a fresh modification time.
    pub fn write(&self, id: &TileId, bytes: &[u8]) -> Result<(), TileError> {
        write_atomic(&self.tile_path(id), bytes, None)
    }

    /// Writes encoded tile bytes and stamps them with `modified`.
    pub fn write_stamped(
        &self,
        id: &TileId,
        bytes: &[u8],
        modified: Timestamp,
    ) -> Result<(), TileError> {
        write_atomic(&self.tile_path(id), bytes, Some(modified))
    }

    /// Reads the placeholder asset, or `None` if it has not been generated.
    pub fn read_placeholder(&self) -> Result<Option<PlaceholderAsset>, TileError> {
        let path = self.placeholder_path();
        let Some(modified) = Timestamp::of_path(&path).map_err(|e| TileError::io(&path, e))? else {
            return Ok(None);
        };
        let bytes = std::fs::read(&path).map_err(|e| TileError::io(&path, e))?;
        Ok(Some(PlaceholderAsset { bytes, modified }))
    }

    /// Copies the placeholder into a tile slot, preserving its timestamp.
    ///
    /// The copy compares equal to the placeholder under [`is_stale`], so a
    /// slot that already holds it is never rewritten.
    ///
    /// [`is_stale`]: super::is_stale
    pub fn copy_placeholder(&self, id: &TileId, asset: &PlaceholderAsset) -> Result<(), TileError> {
        self.write_stamped(id, &asset.bytes, asset.modified)
    }

    /// Writes the placeholder asset itself.
    pub fn write_placeholder(&self, bytes: &[u8]) -> Result<(), TileError> {
        write_atomic(&self.placeholder_path(), bytes, None)
    }
}

/// Replaces `path` with `bytes` via a temporary sibling and a rename.
///
/// Parent directories are created as needed. When `modified` is given the
/// file carries that modification time once it becomes visible.
fn write_atomic(
    path: &Path,
    bytes: &[u8],
    modified: Option<Timestamp>,
) -> Result<(), TileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| TileError::io(parent, e))?;
    }

    let temp_path = path.with_extension("png.tmp");
    let result = (|| {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        if let Some(modified) = modified {
            file.set_modified(modified.as_system_time())?;
        }
        drop(file);
        std::fs::rename(&temp_path, path)
    })();

    result.map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        TileError::io(path, e)
    })
}
