//! Error types for sheetgen-core

use std::fmt;

use thiserror::Error;

use crate::types::DecodeError;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Position of a cell inside a workbook, used in diagnostics.
///
/// Row and column are 0-based positions in the sheet matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellLocator {
    /// Workbook path as it was discovered
    pub workbook: String,
    /// Sheet name
    pub sheet: String,
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub column: usize,
}

impl CellLocator {
    pub fn new(workbook: &str, sheet: &str, row: usize, column: usize) -> Self {
        Self {
            workbook: workbook.to_string(),
            sheet: sheet.to_string(),
            row,
            column,
        }
    }
}

impl fmt::Display for CellLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sheet:{} row:{} cell:{}",
            self.workbook, self.sheet, self.row, self.column
        )
    }
}

/// Errors that can occur while decoding a sheet
#[derive(Debug, Error)]
pub enum Error {
    /// A schema cell names a type outside the supported set
    #[error("error type in {at} value:{tag}")]
    UnknownType { at: CellLocator, tag: String },

    /// A data cell does not parse as its declared type
    #[error("error value in {at} value:{value} ({source})")]
    InvalidValue {
        at: CellLocator,
        value: String,
        #[source]
        source: DecodeError,
    },

    /// A vertical-sheet data row is missing its value column
    #[error("error value in {workbook} sheet:{sheet} row:{row} cellLen:{len}, expected more than {required}")]
    ShortRow {
        workbook: String,
        sheet: String,
        row: usize,
        len: usize,
        required: usize,
    },
}

impl Error {
    /// The locator of the offending cell, if the error points at one
    pub fn locator(&self) -> Option<&CellLocator> {
        match self {
            Error::UnknownType { at, .. } | Error::InvalidValue { at, .. } => Some(at),
            Error::ShortRow { .. } => None,
        }
    }
}
