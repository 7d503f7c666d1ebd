//! Error types for the build pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a build
#[derive(Debug, Error)]
pub enum Error {
    /// Schema or cell decode error
    #[error(transparent)]
    Decode(#[from] sheetgen_core::Error),

    /// A sheet of an opened workbook could not be read
    #[error("failed to read sheet '{sheet}' of {}: {source}", workbook.display())]
    SheetRead {
        workbook: PathBuf,
        sheet: String,
        #[source]
        source: sheetgen_xlsx::XlsxError,
    },

    /// Output could not be written
    #[error(transparent)]
    Emit(#[from] sheetgen_emit::EmitError),

    /// The manifest could not be saved
    #[error("failed to write manifest {}: {source}", path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
