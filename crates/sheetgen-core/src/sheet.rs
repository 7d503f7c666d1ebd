//! Sheet model: a named, positional matrix of cell text

use crate::{HIDDEN_SHEET_SUFFIX, SINGLE_SHEET_SUFFIX};

/// How a sheet's cells map to records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// A table: schema in the header rows, one record per data row
    Horizontal,
    /// A key/value list: one field per data row, one record per sheet
    Vertical,
}

/// A worksheet as delivered by a reader.
///
/// Rows may have different lengths; a missing cell reads as the empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create a sheet from a row-major matrix
    pub fn from_rows<N, S>(name: N, rows: Vec<Vec<S>>) -> Self
    where
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// A single row, if present
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Text of a cell; empty when the row or column is absent
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }

    /// Hidden sheets are excluded from the build
    pub fn is_hidden(&self) -> bool {
        is_hidden_sheet(&self.name)
    }

    /// Orientation selected by the sheet name
    pub fn orientation(&self) -> Orientation {
        orientation_of(&self.name)
    }
}

/// Whether a sheet name marks the sheet as hidden
pub fn is_hidden_sheet(name: &str) -> bool {
    name.ends_with(HIDDEN_SHEET_SUFFIX)
}

/// Orientation for a sheet name
pub fn orientation_of(name: &str) -> Orientation {
    if name.ends_with(SINGLE_SHEET_SUFFIX) {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}
