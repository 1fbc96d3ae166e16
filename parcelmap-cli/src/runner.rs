//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and builder creation
//! to reduce duplication across command handlers.

use std::path::Path;

use parcelmap::build::PyramidBuilder;
use parcelmap::config::ConfigFile;
use parcelmap::grid::GridLayout;
use parcelmap::logging::{init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    _logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load the config at `config_path` (defaults when absent) and start logging.
    pub fn new(config_path: &Path, verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load_from(config_path)?;

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file, verbose)
            .map_err(CliError::LoggingInit)?;

        info!(config = %config_path.display(), "parcelmap v{}", parcelmap::VERSION);

        Ok(Self {
            _logging_guard: logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            parcels = %self.config.paths.parcels_dir.display(),
            output = %self.config.paths.output_dir.display(),
            "Starting"
        );
    }

    /// The grid layout from the `[grid]` section.
    pub fn layout(&self) -> Result<GridLayout, CliError> {
        self.config
            .layout()
            .map_err(|e| CliError::Config(e.into()))
    }

    /// Create a pyramid builder from the loaded configuration.
    pub fn builder(&self) -> Result<PyramidBuilder, CliError> {
        let builder = PyramidBuilder::new(
            self.layout()?,
            &self.config.paths.output_dir,
            &self.config.paths.parcels_dir,
            self.config.build_options(),
        )?;
        Ok(builder)
    }
}
