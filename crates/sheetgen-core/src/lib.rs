//! # sheetgen-core
//!
//! Core data structures and decoding logic for sheetgen.
//!
//! This crate provides:
//! - [`Value`] - A decoded cell value (integer, float, string, boolean, array, object)
//! - [`TypeTag`] - The closed set of column types and their decoders
//! - [`Sheet`] - A sheet as a positional matrix of cell text
//! - [`decode_sheet`] - Schema-directed decoding of a sheet into client/server views
//!
//! ## Example
//!
//! ```rust
//! use sheetgen_core::{decode_sheet, Sheet, Value};
//!
//! let sheet = Sheet::from_rows(
//!     "Items",
//!     vec![
//!         vec!["desc"],
//!         vec!["", "id"],
//!         vec!["", "id"],
//!         vec!["", "number"],
//!         vec!["START"],
//!         vec!["", "1"],
//!         vec!["END"],
//!     ],
//! );
//!
//! let views = decode_sheet("items.xlsx", &sheet).unwrap();
//! assert_eq!(views.server[0]["id"], Value::Int(1));
//! ```

pub mod decode;
pub mod error;
pub mod sheet;
pub mod types;
pub mod value;

pub use decode::{decode_sheet, Audience, SheetViews};
pub use error::{CellLocator, Error, Result};
pub use sheet::{Orientation, Sheet};
pub use types::{DecodeError, TypeTag};
pub use value::{Record, Value};

/// Control-column marker that opens the data section of a sheet
pub const START_MARKER: &str = "START";

/// Control-column marker that closes the data section of a sheet
pub const END_MARKER: &str = "END";

/// Control-column marker for a commented-out row
pub const COMMENT_MARKER: &str = "#";

/// Sheet-name suffix that hides a sheet from the build
pub const HIDDEN_SHEET_SUFFIX: &str = "#";

/// Sheet-name suffix that selects vertical (key/value) orientation
pub const SINGLE_SHEET_SUFFIX: &str = "_single";
