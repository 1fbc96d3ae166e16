//! Claim map export for the parcel claiming front end.
//!
//! The map is a JSON object keyed by parcel address:
//!
//! ```json
//! { "H4": { "claimed": true }, "A19": { "claimed": false } }
//! ```
//!
//! Parcels with a source file come first, then every claimable parcel that
//! has none. Both groups are in row-major order.

use std::path::Path;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::grid::{GridLayout, GridPosition};
use crate::source::ParcelIndex;

/// Claim status of a single parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimStatus {
    pub claimed: bool,
}

/// Ordered claim status of every listed parcel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimMap {
    entries: Vec<(GridPosition, ClaimStatus)>,
}

impl ClaimMap {
    /// Builds the map from a parcel directory snapshot.
    pub fn build(layout: &GridLayout, index: &ParcelIndex) -> Self {
        let mut entries: Vec<_> = index
            .positions()
            .map(|pos| (pos, ClaimStatus { claimed: true }))
            .collect();
        entries.extend(
            layout
                .claimable_positions()
                .filter(|pos| !index.contains(*pos))
                .map(|pos| (pos, ClaimStatus { claimed: false })),
        );
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of claimed parcels.
    pub fn claimed(&self) -> usize {
        self.entries.iter().filter(|(_, s)| s.claimed).count()
    }

    /// Status of one parcel, if listed.
    pub fn get(&self, pos: GridPosition) -> Option<ClaimStatus> {
        self.entries
            .iter()
            .find(|(p, _)| *p == pos)
            .map(|(_, status)| *status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(GridPosition, ClaimStatus)> {
        self.entries.iter()
    }

    /// Serializes the map as JSON, indented unless `minify` is set.
    pub fn to_json(&self, minify: bool) -> serde_json::Result<String> {
        if minify {
            serde_json::to_string(self)
        } else {
            serde_json::to_string_pretty(self)
        }
    }

    /// Writes the map to `path` as JSON.
    pub fn write(&self, path: &Path, minify: bool) -> std::io::Result<()> {
        let json = self.to_json(minify)?;
        std::fs::write(path, json + "\n")
    }
}

impl Serialize for ClaimMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (pos, status) in &self.entries {
            map.serialize_entry(&pos.address(), status)?;
        }
        map.end()
    }
}
