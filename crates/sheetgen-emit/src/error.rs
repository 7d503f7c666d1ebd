//! Emitter error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for emit operations
pub type EmitResult<T> = std::result::Result<T, EmitError>;

/// Errors that can occur while writing outputs
#[derive(Debug, Error)]
pub enum EmitError {
    /// Output directory could not be created
    #[error("create dir error: {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be written
    #[error("write error: {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialisation error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
