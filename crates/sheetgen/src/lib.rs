//! # sheetgen
//!
//! Compiles designer-authored `.xlsx` workbooks into per-audience data
//! tables for a game client and server.
//!
//! Every visible sheet of every workbook under a source directory is decoded
//! against the schema in its header rows and written as JSON and Lua, once
//! for the client and once for the server. Unchanged workbooks are skipped
//! using a manifest of modification times.
//!
//! ## Features
//!
//! - Horizontal (one record per row) and vertical (`_single`, one record per
//!   sheet) layouts
//! - Typed columns: `string`, `boolean`, `number`, `object`, `array`
//! - Per-column client/server name mapping
//! - Incremental builds
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetgen::prelude::*;
//!
//! let options = BuildOptions {
//!     source_dir: "design/excel".into(),
//!     ..Default::default()
//! };
//! let report = sheetgen::run(options).unwrap();
//! println!("{} sheets written", report.sheets_emitted);
//! ```

pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod prelude;

pub use error::{Error, Result};
pub use manifest::{manifest_key, modified_nanos, Manifest, DEFAULT_MANIFEST_PATH};
pub use pipeline::{
    discover_workbooks, is_workbook_file, run, BuildOptions, BuildReport, Builder,
};

// Re-export core types
pub use sheetgen_core::{
    decode_sheet, Audience, CellLocator, DecodeError, Orientation, Record, Sheet, SheetViews,
    TypeTag, Value,
};

// Re-export I/O types
pub use sheetgen_emit::{EmitError, EmitOptions, Format, OutputWriter};
pub use sheetgen_xlsx::{XlsxError, XlsxReader, XlsxWorkbook};
