//! Build statistics.

use tracing::info;

use super::ChangeSet;
use crate::compress::CompressionStats;
use crate::tile::Layer;

/// Work done on one zoom level of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStats {
    pub layer: Layer,
    pub zoom: u8,
    pub rebuilt: usize,
    pub up_to_date: usize,
}

/// Outcome of a build invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Every tile written, in the order it was settled
    pub changes: ChangeSet,
    /// Per-level counts in processing order
    pub levels: Vec<LevelStats>,
    /// Sources that were unusable and replaced by blank leaves
    pub source_warnings: usize,
    /// Compression pass results, if the pass ran
    pub compression: Option<CompressionStats>,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the build found nothing to do.
    pub fn is_up_to_date(&self) -> bool {
        self.changes.is_empty()
    }

    /// Total number of tiles written.
    pub fn rebuilt(&self) -> usize {
        self.changes.len()
    }

    /// Counts for one level, if it was processed.
    pub fn level(&self, layer: Layer, zoom: u8) -> Option<&LevelStats> {
        self.levels
            .iter()
            .rev()
            .find(|l| l.layer == layer && l.zoom == zoom)
    }

    pub(crate) fn record_level(&mut self, stats: LevelStats) {
        info!(
            layer = %stats.layer,
            zoom = stats.zoom,
            rebuilt = stats.rebuilt,
            up_to_date = stats.up_to_date,
            "Level settled"
        );
        self.levels.push(stats);
    }

    /// Logs a one-line summary of the build.
    pub fn log_summary(&self) {
        info!(
            images = self.changes.count(Layer::Images),
            labels = self.changes.count(Layer::Labels),
            source_warnings = self.source_warnings,
            "Build finished"
        );
        if let Some(stats) = &self.compression {
            info!(
                compressed = stats.compressed,
                unchanged = stats.unchanged,
                failed = stats.failed,
                saved_bytes = stats.saved(),
                "Compression pass finished"
            );
        }
    }
}
