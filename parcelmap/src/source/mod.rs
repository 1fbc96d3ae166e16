//! Parcel source files.
//!
//! Sources live in a single flat directory, one PNG per parcel, named after
//! the parcel address (see [`parse_parcel_filename`]). The directory is
//! scanned once per build into a [`ParcelIndex`]; the build never writes to it.

mod convert;
mod filename;

pub use convert::{load_source, SourceContent};
pub use filename::{parcel_filename, parse_parcel_filename};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::grid::{GridLayout, GridPosition};
use crate::tile::Timestamp;

/// Problems with a single source file. The parcel is treated as absent.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a decodable PNG
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image is not tile-sized
    #[error("{} is {width}x{height}, expected {expected}x{expected}", path.display())]
    Dimensions {
        path: PathBuf,
        width: u32,
        height: u32,
        expected: u32,
    },
}

/// A source file found during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelFile {
    pub path: PathBuf,
    pub modified: Timestamp,
}

/// Snapshot of the source directory: grid position to source file.
#[derive(Debug, Clone, Default)]
pub struct ParcelIndex {
    parcels: BTreeMap<GridPosition, ParcelFile>,
}

impl ParcelIndex {
    /// An index with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a source for `pos`, replacing any previous entry.
    pub fn insert(&mut self, pos: GridPosition, file: ParcelFile) {
        self.parcels.insert(pos, file);
    }

    /// The source registered for `pos`, if any.
    pub fn get(&self, pos: GridPosition) -> Option<&ParcelFile> {
        self.parcels.get(&pos)
    }

    pub fn contains(&self, pos: GridPosition) -> bool {
        self.parcels.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    /// Registered positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.parcels.keys().copied()
    }
}

/// The directory holding parcel source files.
#[derive(Debug, Clone)]
pub struct ParcelDirectory {
    path: PathBuf,
}

impl ParcelDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scans the directory into an index of the parcels inside `layout`.
    ///
    /// Files whose names are not parcel addresses, and addresses outside the
    /// grid, are skipped. When two names map to the same parcel (differing
    /// only in case) the first in byte order wins. A missing directory yields
    /// an empty index.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory exists but cannot be listed.
    /// Entries that cannot be read are logged and skipped.
    pub fn scan(&self, layout: &GridLayout) -> std::io::Result<ParcelIndex> {
        let mut index = ParcelIndex::new();

        let entries = match std::fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Parcel directory does not exist");
                return Ok(index);
            }
            Err(e) => return Err(e),
        };

        let mut named: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Cannot read parcel directory entry");
                    continue;
                }
            };
            if let Some(name) = entry.file_name().to_str() {
                named.push((name.to_string(), entry.path()));
            }
        }
        named.sort();

        for (name, path) in named {
            let Some(pos) = parse_parcel_filename(&name) else {
                debug!(file = %name, "Skipping file with unrecognised name");
                continue;
            };
            if !layout.contains(pos) {
                debug!(file = %name, address = %pos, "Skipping parcel outside the grid");
                continue;
            }
            if index.contains(pos) {
                warn!(file = %name, address = %pos, "Duplicate parcel file ignored");
                continue;
            }

            let metadata = match std::fs::metadata(&path) {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    warn!(file = %name, error = %e, "Cannot stat parcel file");
                    continue;
                }
            };
            let modified = match Timestamp::from_metadata(&metadata) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!(file = %name, error = %e, "Cannot read parcel modification time");
                    continue;
                }
            };
            index.insert(pos, ParcelFile { path, modified });
        }

        debug!(path = %self.path.display(), parcels = index.len(), "Scanned parcel directory");
        Ok(index)
    }
}
