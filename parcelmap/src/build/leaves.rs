//! Leaf synchronization: settle every max-zoom tile of a layer.

use tracing::{debug, trace, warn};

use super::{BuildError, BuildReport, LevelStats, PyramidBuilder, RebuildPolicy};
use crate::grid::TilePosition;
use crate::provider::{LeafContent, LeafError, LeafProvider, LeafRequirement};
use crate::tile::{is_stale, PlaceholderAsset, TileId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafOutcome {
    UpToDate,
    Rebuilt { warned: bool },
}

impl PyramidBuilder {
    /// Brings every leaf of the provider's layer up to date.
    ///
    /// A leaf is regenerated when it is missing or its requirement is newer
    /// than it. Leaves whose source is unusable are written blank and counted
    /// as source warnings. Regenerated leaves are appended to the report's
    /// change set in position order.
    pub fn sync_leaves(
        &self,
        provider: &dyn LeafProvider,
        placeholder: &PlaceholderAsset,
        policy: RebuildPolicy,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        let layer = provider.layer();
        let zoom = self.layout.max_zoom();
        let positions: Vec<TilePosition> = self.layout.tile_positions(zoom).collect();
        debug!(layer = %layer, zoom, leaves = positions.len(), ?policy, "Synchronizing leaves");

        let outcomes = self.runner.run(&positions, |pos| {
            self.sync_leaf(provider, TileId::new(layer, zoom, *pos), placeholder, policy)
        });

        let mut stats = LevelStats {
            layer,
            zoom,
            rebuilt: 0,
            up_to_date: 0,
        };
        for (pos, outcome) in positions.iter().zip(outcomes) {
            match outcome? {
                LeafOutcome::UpToDate => stats.up_to_date += 1,
                LeafOutcome::Rebuilt { warned } => {
                    stats.rebuilt += 1;
                    if warned {
                        report.source_warnings += 1;
                    }
                    report.changes.push(TileId::new(layer, zoom, *pos));
                }
            }
        }
        report.record_level(stats);
        Ok(())
    }

    fn sync_leaf(
        &self,
        provider: &dyn LeafProvider,
        id: TileId,
        placeholder: &PlaceholderAsset,
        policy: RebuildPolicy,
    ) -> Result<LeafOutcome, BuildError> {
        let requirement = provider.requirement(id.position);
        let existing = self.store.modified(&id)?;

        let stale = match (policy, &requirement) {
            (RebuildPolicy::Always, _) => true,
            (_, LeafRequirement::Placeholder) => is_stale(placeholder.modified, existing),
            (_, LeafRequirement::Source { modified, .. }) => is_stale(*modified, existing),
            (_, LeafRequirement::Generated) => existing.is_none(),
        };
        if !stale {
            return Ok(LeafOutcome::UpToDate);
        }

        let (content, warned) = match provider.generate(id.position, &requirement) {
            Ok(content) => (content, false),
            Err(LeafError::Source(e)) => {
                warn!(tile = %id, error = %e, "Unusable source, writing blank tile");
                (LeafContent::Blank, true)
            }
            Err(LeafError::Tile(e)) => return Err(e.into()),
        };

        match content {
            LeafContent::Placeholder => self.store.copy_placeholder(&id, placeholder)?,
            LeafContent::Blank => self.write_fresh(&id, &placeholder.bytes, &requirement)?,
            LeafContent::Png(bytes) => self.write_fresh(&id, &bytes, &requirement)?,
        }

        trace!(tile = %id, "Leaf regenerated");
        Ok(LeafOutcome::Rebuilt { warned })
    }

    /// Writes leaf content with a current timestamp.
    ///
    /// A source dated in the future stays newer than its leaf, so that leaf
    /// and its ancestors are rebuilt on every run until the clock catches up.
    fn write_fresh(
        &self,
        id: &TileId,
        bytes: &[u8],
        requirement: &LeafRequirement,
    ) -> Result<(), BuildError> {
        if let LeafRequirement::Source { path, modified } = requirement {
            if *modified > Timestamp::now() {
                warn!(
                    tile = %id,
                    source = %path.display(),
                    "Source is dated in the future, it will be rebuilt on every run"
                );
            }
        }
        self.store.write(id, bytes)?;
        Ok(())
    }
}
