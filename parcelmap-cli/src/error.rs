//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and the fatal exit code.

use std::fmt;
use std::path::PathBuf;
use std::process;

use parcelmap::build::BuildError;
use parcelmap::config::ConfigFileError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Configuration file could not be read, parsed or written
    Config(ConfigFileError),
    /// A build could not start or was aborted
    Build(BuildError),
    /// Refused to overwrite an existing file
    AlreadyExists(PathBuf),
    /// Failed to write output file
    FileWrite { path: PathBuf, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an error message and status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Build(BuildError::NotInitialized(_))
            | CliError::Build(BuildError::PlaceholderMissing(_)) => {
                eprintln!();
                eprintln!("Run 'parcelmap rebuild' to initialize the output directory.");
            }
            CliError::AlreadyExists(_) => {
                eprintln!();
                eprintln!("Use --force to overwrite it.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Build(e) => write!(f, "Build failed: {}", e),
            CliError::AlreadyExists(path) => {
                write!(f, "File '{}' already exists", path.display())
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Build(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::AlreadyExists(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<BuildError> for CliError {
    fn from(e: BuildError) -> Self {
        CliError::Build(e)
    }
}
