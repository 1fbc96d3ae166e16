//! `rebuild` and `build` commands.

use parcelmap::build::BuildReport;
use parcelmap::tile::Layer;

use super::ExitStatus;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Wipe the output root and build everything.
pub fn run_rebuild(runner: &CliRunner) -> Result<ExitStatus, CliError> {
    runner.log_startup("rebuild");
    let report = runner.builder()?.rebuild()?;
    print_report(&report);
    Ok(exit_status(&report))
}

/// Incremental build of both pyramids.
pub fn run_build(runner: &CliRunner) -> Result<ExitStatus, CliError> {
    runner.log_startup("build");
    let report = runner.builder()?.build()?;
    print_report(&report);
    Ok(exit_status(&report))
}

fn exit_status(report: &BuildReport) -> ExitStatus {
    if report.is_up_to_date() {
        ExitStatus::UpToDate
    } else {
        ExitStatus::Rebuilt
    }
}

fn print_report(report: &BuildReport) {
    if report.is_up_to_date() {
        println!("Up to date.");
        return;
    }

    println!(
        "Rebuilt {} tile(s): {} image, {} label",
        report.rebuilt(),
        report.changes.count(Layer::Images),
        report.changes.count(Layer::Labels)
    );
    if report.source_warnings > 0 {
        println!(
            "{} parcel file(s) could not be used, see the log for details",
            report.source_warnings
        );
    }
    if let Some(stats) = &report.compression {
        println!(
            "Compressed {} tile(s), saved {} bytes",
            stats.compressed,
            stats.saved()
        );
    }
}
