//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the
/// INI, then checks that the grid settings describe a valid layout.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [paths] section
    if let Some(section) = ini.section(Some("paths")) {
        if let Some(v) = section.get("parcels_dir") {
            config.paths.parcels_dir = parse_path("paths", "parcels_dir", v)?;
        }
        if let Some(v) = section.get("output_dir") {
            config.paths.output_dir = parse_path("paths", "output_dir", v)?;
        }
    }

    // [grid] section
    if let Some(section) = ini.section(Some("grid")) {
        if let Some(v) = section.get("grid_size") {
            config.grid.grid_size =
                parse_number("grid", "grid_size", v, "must be a positive integer")?;
        }
        if let Some(v) = section.get("tile_size") {
            config.grid.tile_size =
                parse_number("grid", "tile_size", v, "must be a positive integer (pixels)")?;
        }
        if let Some(v) = section.get("min_zoom") {
            config.grid.min_zoom =
                parse_number("grid", "min_zoom", v, "must be an integer from 0 to 255")?;
        }
        if let Some(v) = section.get("max_zoom") {
            config.grid.max_zoom =
                parse_number("grid", "max_zoom", v, "must be an integer from 0 to 255")?;
        }
        if let Some(v) = section.get("claim_radius") {
            config.grid.claim_radius =
                parse_number("grid", "claim_radius", v, "must be a number (grid units)")?;
        }
    }

    // [build] section
    if let Some(section) = ini.section(Some("build")) {
        if let Some(v) = section.get("parallel") {
            config.build.parallel = parse_bool("build", "parallel", v)?;
        }
        if let Some(v) = section.get("threads") {
            config.build.threads = parse_number(
                "build",
                "threads",
                v,
                "must be a non-negative integer (0 = one per core)",
            )?;
        }
        if let Some(v) = section.get("compress") {
            config.build.compress = parse_bool("build", "compress", v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            config.logging.directory = parse_path("logging", "directory", v)?;
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if v.is_empty() || v.contains(['/', '\\']) {
                return Err(invalid("logging", "file", v, "must be a plain file name"));
            }
            config.logging.file = v.to_string();
        }
    }

    config.layout()?;
    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_path(section: &str, key: &str, value: &str) -> Result<PathBuf, ConfigFileError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(invalid(section, key, value, "must not be empty"));
    }
    Ok(PathBuf::from(v))
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(section, key, value, "must be true or false")),
    }
}
