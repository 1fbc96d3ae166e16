//! parcelmap CLI - Command-line interface
//!
//! Builds and maintains the image and label tile pyramids of a parcel grid.
//!
//! Exit status: `0` when everything was already up to date, `2` when tiles
//! were rebuilt and `1` on a fatal error.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "parcelmap")]
#[command(version = parcelmap::VERSION)]
#[command(about = "Incremental tile pyramid builder for parcel grid worlds", long_about = None)]
struct Cli {
    /// Configuration file (defaults to parcelmap.ini in the working directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wipe the output root and build both pyramids from scratch
    Rebuild,

    /// Bring the pyramids up to date with the parcel directory
    Build,

    /// Write the claim map JSON
    Claims {
        /// Output file
        #[arg(long, short, default_value = "map.json")]
        output: PathBuf,

        /// Write compact JSON without indentation
        #[arg(long)]
        minify: bool,
    },

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(parcelmap::config::default_config_path);

    let result = match cli.command {
        Commands::Rebuild => CliRunner::new(&config_path, cli.verbose)
            .and_then(|runner| commands::build::run_rebuild(&runner)),
        Commands::Build => CliRunner::new(&config_path, cli.verbose)
            .and_then(|runner| commands::build::run_build(&runner)),
        Commands::Claims { output, minify } => CliRunner::new(&config_path, cli.verbose)
            .and_then(|runner| commands::claims::run(&runner, &output, minify)),
        Commands::Config(command) => commands::config::run(command, &config_path),
    };

    match result {
        Ok(status) => process::exit(status.code()),
        Err(e) => e.exit(),
    }
}
