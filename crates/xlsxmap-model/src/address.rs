use thiserror::Error;

/// Excel's largest 1-based row number.
pub const EXCEL_MAX_ROWS: u32 = 1_048_576;
/// Excel's largest 1-based column number (`XFD`).
pub const EXCEL_MAX_COLS: u32 = 16_384;

/// Errors that can occur when parsing an A1 cell reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum A1ParseError {
    #[error("empty A1 reference")]
    Empty,
    #[error("missing column in A1 reference")]
    MissingColumn,
    #[error("missing row in A1 reference")]
    MissingRow,
    #[error("invalid column in A1 reference")]
    InvalidColumn,
    #[error("invalid row in A1 reference")]
    InvalidRow,
    #[error("trailing characters in A1 reference")]
    TrailingCharacters,
}

/// Parse an A1-style reference (`B7`, `$AA$10`) into **1-based** `(row, col)`.
pub fn parse_a1(a1: &str) -> Result<(u32, u32), A1ParseError> {
    let s = a1.trim();
    if s.is_empty() {
        return Err(A1ParseError::Empty);
    }

    let bytes = s.as_bytes();
    let mut idx = 0usize;
    if bytes.get(idx) == Some(&b'$') {
        idx += 1;
    }

    let col_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
        idx += 1;
    }
    if idx == col_start {
        return Err(A1ParseError::MissingColumn);
    }
    let col = name_to_col(&s[col_start..idx])?;

    if bytes.get(idx) == Some(&b'$') {
        idx += 1;
    }
    let row_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == row_start {
        return Err(A1ParseError::MissingRow);
    }
    if idx != bytes.len() {
        return Err(A1ParseError::TrailingCharacters);
    }

    let row: u32 = s[row_start..idx]
        .parse()
        .map_err(|_| A1ParseError::InvalidRow)?;
    if row == 0 || row > EXCEL_MAX_ROWS {
        return Err(A1ParseError::InvalidRow);
    }
    Ok((row, col))
}

fn name_to_col(s: &str) -> Result<u32, A1ParseError> {
    let mut col: u32 = 0;
    for b in s.bytes() {
        let v = (b.to_ascii_uppercase() - b'A') as u32 + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(v))
            .ok_or(A1ParseError::InvalidColumn)?;
    }
    if col == 0 || col > EXCEL_MAX_COLS {
        return Err(A1ParseError::InvalidColumn);
    }
    Ok(col)
}
