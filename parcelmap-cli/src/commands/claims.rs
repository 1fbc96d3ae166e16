//! `claims` command: writes which parcels are taken.

use std::path::Path;

use parcelmap::claims::ClaimMap;
use tracing::info;

use super::ExitStatus;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Scan the parcel directory and write the claim map to `output`.
pub fn run(runner: &CliRunner, output: &Path, minify: bool) -> Result<ExitStatus, CliError> {
    runner.log_startup("claims");
    let layout = runner.layout()?;
    let index = runner.builder()?.scan_parcels()?;

    let map = ClaimMap::build(&layout, &index);
    map.write(output, minify).map_err(|error| CliError::FileWrite {
        path: output.to_path_buf(),
        error,
    })?;

    info!(
        path = %output.display(),
        parcels = map.len(),
        claimed = map.claimed(),
        "Claim map written"
    );
    println!(
        "Wrote {} ({} of {} parcels claimed)",
        output.display(),
        map.claimed(),
        map.len()
    );
    Ok(ExitStatus::UpToDate)
}
