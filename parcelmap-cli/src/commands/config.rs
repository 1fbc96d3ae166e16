//! Configuration management CLI commands.
//!
//! Provides `config init` and `config show` for creating and inspecting the
//! configuration file.

use std::path::Path;

use clap::Subcommand;
use parcelmap::config::ConfigFile;

use super::ExitStatus;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a commented configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, path: &Path) -> Result<ExitStatus, CliError> {
    match command {
        ConfigCommands::Init { force } => run_init(path, force)?,
        ConfigCommands::Show => run_show(path)?,
    }
    Ok(ExitStatus::UpToDate)
}

/// Write the default configuration file.
fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::AlreadyExists(path.to_path_buf()));
    }

    ConfigFile::default().save_to(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Print the configuration in effect, defaults included.
fn run_show(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;

    if path.exists() {
        println!("# Loaded from {}", path.display());
    } else {
        println!("# {} not found, showing defaults", path.display());
    }
    print!("{}", config.to_ini_string());
    Ok(())
}
