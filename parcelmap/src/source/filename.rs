//! Parcel source filename codec.
//!
//! Sources are named `tile-{ROW}{COL}.png`, where `ROW` is the row letter
//! code and `COL` the 1-based column, e.g. `tile-H4.png`. Matching is
//! case-insensitive.

use regex::Regex;
use std::sync::OnceLock;

use crate::grid::{row_index, GridPosition};

fn parcel_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^tile-([a-z]+)(\d+)\.png$").ok())
        .as_ref()
}

/// Parses a source filename into its grid position.
///
/// Returns `None` for names that do not follow the parcel naming scheme,
/// including column `0`.
///
/// # Examples
///
/// ```
/// use parcelmap::grid::GridPosition;
/// use parcelmap::source::parse_parcel_filename;
///
/// assert_eq!(parse_parcel_filename("tile-H4.png"), Some(GridPosition::new(7, 3)));
/// assert_eq!(parse_parcel_filename("tile-al38.PNG"), Some(GridPosition::new(37, 37)));
/// assert_eq!(parse_parcel_filename("notes.txt"), None);
/// ```
pub fn parse_parcel_filename(filename: &str) -> Option<GridPosition> {
    let captures = parcel_pattern()?.captures(filename)?;
    let row = row_index(captures.get(1)?.as_str())?;
    let col: u32 = captures.get(2)?.as_str().parse().ok()?;
    Some(GridPosition::new(row, col.checked_sub(1)?))
}

/// Canonical source filename for a grid position.
pub fn parcel_filename(pos: GridPosition) -> String {
    format!("tile-{}.png", pos.address())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_parcel() {
        assert_eq!(
            parse_parcel_filename("tile-A1.png"),
            Some(GridPosition::new(0, 0))
        );
    }

    #[test]
    fn test_parse_double_letter_rows() {
        assert_eq!(
            parse_parcel_filename("tile-AL38.png"),
            Some(GridPosition::new(37, 37))
        );
        assert_eq!(
            parse_parcel_filename("tile-AA10.png"),
            Some(GridPosition::new(26, 9))
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            parse_parcel_filename("TILE-r17.Png"),
            Some(GridPosition::new(17, 16))
        );
    }

    #[test]
    fn test_parse_rejects_other_names() {
        assert_eq!(parse_parcel_filename("tile-A0.png"), None);
        assert_eq!(parse_parcel_filename("tile-A1.jpg"), None);
        assert_eq!(parse_parcel_filename("tile-1A.png"), None);
        assert_eq!(parse_parcel_filename("tile-A1.png.bak"), None);
        assert_eq!(parse_parcel_filename("xtile-A1.png"), None);
        assert_eq!(parse_parcel_filename("tile-A99999999999.png"), None);
        assert_eq!(parse_parcel_filename("placeholder_tile.png"), None);
    }

    #[test]
    fn test_filename_round_trip() {
        for pos in [
            GridPosition::new(0, 0),
            GridPosition::new(7, 3),
            GridPosition::new(37, 37),
        ] {
            assert_eq!(parse_parcel_filename(&parcel_filename(pos)), Some(pos));
        }
        assert_eq!(parcel_filename(GridPosition::new(7, 3)), "tile-H4.png");
    }
}
