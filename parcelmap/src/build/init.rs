//! Initialization: a clean output root with a complete label layer.

use tracing::info;

use super::{BuildError, BuildReport, PyramidBuilder, RebuildPolicy};
use crate::placeholder::generate_placeholder;
use crate::provider::{LabelLeafProvider, LeafProvider};
use crate::tile::PlaceholderAsset;

impl PyramidBuilder {
    /// Clears the output root and builds the label layer from scratch.
    ///
    /// Deletes everything under the output root, writes a new placeholder
    /// asset, then generates every label leaf and parent regardless of
    /// timestamps. The image layer is left empty.
    ///
    /// # Errors
    ///
    /// Fails if the root cannot be cleared or created, or if the parcel
    /// directory lives inside it.
    pub fn initialize(&self) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::new();
        self.initialize_into(&mut report)?;
        self.compress_changes(&mut report);
        report.log_summary();
        Ok(report)
    }

    pub(super) fn initialize_into(
        &self,
        report: &mut BuildReport,
    ) -> Result<PlaceholderAsset, BuildError> {
        self.reset_output_root()?;

        let bytes =
            generate_placeholder(self.layout.tile_size()).map_err(BuildError::Placeholder)?;
        self.store.write_placeholder(&bytes)?;
        let placeholder = self.load_placeholder()?;

        let provider = LabelLeafProvider::new(&self.layout);
        info!(
            claimable = self.layout.claimable_positions().count(),
            "Building label layer"
        );
        self.sync_leaves(&provider, &placeholder, RebuildPolicy::Always, report)?;
        self.propagate(provider.layer(), RebuildPolicy::Always, report)?;

        Ok(placeholder)
    }

    fn reset_output_root(&self) -> Result<(), BuildError> {
        let root = self.store.root();
        let setup_err = |source: std::io::Error| BuildError::Setup {
            path: root.to_path_buf(),
            source,
        };

        if root.exists() {
            let canonical_root = root.canonicalize().map_err(setup_err)?;
            if let Ok(parcels) = self.parcels.path().canonicalize() {
                if parcels.starts_with(&canonical_root) {
                    return Err(BuildError::SourcesInsideOutput {
                        output: root.to_path_buf(),
                        parcels: self.parcels.path().to_path_buf(),
                    });
                }
            }

            info!(path = %root.display(), "Clearing output directory");
            std::fs::remove_dir_all(root).map_err(setup_err)?;
        }

        std::fs::create_dir_all(root).map_err(setup_err)
    }
}
