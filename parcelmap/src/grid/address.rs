//! Base-26 row letter codec.
//!
//! Rows are named like spreadsheet columns: `A`..`Z`, then `AA`, `AB`, ...

/// Converts a 0-based row index to its letter code.
///
/// ```
/// use parcelmap::grid::row_letters;
///
/// assert_eq!(row_letters(0), "A");
/// assert_eq!(row_letters(25), "Z");
/// assert_eq!(row_letters(26), "AA");
/// assert_eq!(row_letters(37), "AL");
/// ```
pub fn row_letters(index: u32) -> String {
    let mut n = index as u64 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    // Only ASCII uppercase bytes are pushed above.
    String::from_utf8(letters).unwrap_or_default()
}

/// Converts a letter code back to a 0-based row index.
///
/// Case-insensitive. Returns `None` for empty input, non-letters, or codes
/// that overflow `u32`.
pub fn row_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    let mut value: u64 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as u64 + 1;
        value = value.checked_mul(26)?.checked_add(digit)?;
        if value > u32::MAX as u64 + 1 {
            return None;
        }
    }

    u32::try_from(value - 1).ok()
}
