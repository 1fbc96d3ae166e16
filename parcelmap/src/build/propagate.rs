//! Bottom-up propagation from the leaves to the minimum zoom.

use tracing::{debug, trace};

use super::{BuildError, BuildReport, LevelStats, PyramidBuilder, RebuildPolicy};
use crate::grid::TilePosition;
use crate::tile::{is_stale, Layer, TileId, Timestamp};

impl PyramidBuilder {
    /// Rebuilds every parent whose children changed, level by level.
    ///
    /// Zoom levels run from `max_zoom - 1` down to `min_zoom`; a level starts
    /// only after the one below it is settled. A parent is rebuilt when it is
    /// missing or any child is strictly newer than it. Rebuilt parents are
    /// appended to the report's change set.
    ///
    /// # Errors
    ///
    /// A parent that needs rebuilding but has a missing child aborts the
    /// build with [`TileError::MissingChild`](crate::tile::TileError).
    pub fn propagate(
        &self,
        layer: Layer,
        policy: RebuildPolicy,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        for zoom in (self.layout.min_zoom()..self.layout.max_zoom()).rev() {
            let positions: Vec<TilePosition> = self.layout.tile_positions(zoom).collect();
            debug!(layer = %layer, zoom, tiles = positions.len(), "Propagating level");

            let outcomes = self.runner.run(&positions, |pos| {
                self.settle_parent(TileId::new(layer, zoom, *pos), policy)
            });

            let mut stats = LevelStats {
                layer,
                zoom,
                rebuilt: 0,
                up_to_date: 0,
            };
            for (pos, outcome) in positions.iter().zip(outcomes) {
                if outcome? {
                    stats.rebuilt += 1;
                    report.changes.push(TileId::new(layer, zoom, *pos));
                } else {
                    stats.up_to_date += 1;
                }
            }
            report.record_level(stats);
        }
        Ok(())
    }

    /// Recomposes `parent` if stale. Returns whether it was written.
    fn settle_parent(&self, parent: TileId, policy: RebuildPolicy) -> Result<bool, BuildError> {
        let mut newest_child: Option<Timestamp> = None;
        let mut missing_child = false;
        for child in parent.children() {
            match self.store.modified(&child)? {
                Some(modified) => newest_child = newest_child.max(Some(modified)),
                None => missing_child = true,
            }
        }

        if policy == RebuildPolicy::Incremental && !missing_child {
            let existing = self.store.modified(&parent)?;
            let stale = match newest_child {
                Some(newest) => is_stale(newest, existing),
                None => existing.is_none(),
            };
            if !stale {
                return Ok(false);
            }
        }

        // A missing child surfaces here as an error.
        let bytes = self.compositor.compose_from_store(&self.store, &parent)?;
        self.store.write(&parent, &bytes)?;

        trace!(tile = %parent, "Parent recomposed");
        Ok(true)
    }
}
