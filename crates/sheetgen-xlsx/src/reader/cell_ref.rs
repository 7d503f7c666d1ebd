//! A1-style cell references

/// Maximum number of rows in a worksheet (Excel limit)
const MAX_ROWS: usize = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
const MAX_COLS: usize = 16_384;

/// Parse an A1-style reference into 0-based `(row, col)`.
///
/// `$` markers are accepted and ignored.
pub(crate) fn parse_cell_ref(s: &str) -> Option<(usize, usize)> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut pos = 0;

    if bytes.get(pos) == Some(&b'$') {
        pos += 1;
    }

    // Column letters
    let col_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
        pos += 1;
    }
    let col = letters_to_column(&s[col_start..pos])?;

    if bytes.get(pos) == Some(&b'$') {
        pos += 1;
    }

    // Row number, 1-based in the reference
    let row: usize = s[pos..].parse().ok()?;
    if row == 0 || row > MAX_ROWS {
        return None;
    }

    Some((row - 1, col))
}

/// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
fn letters_to_column(letters: &str) -> Option<usize> {
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }

    let mut col = 0usize;
    for c in letters.chars() {
        col = col * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }

    let col = col - 1;
    (col < MAX_COLS).then_some(col)
}
