//! # sheetgen-xlsx
//!
//! XLSX (Office Open XML) reader for sheetgen.
//!
//! Only cell text is read: every sheet comes back as a [`Sheet`] whose cells
//! are addressed by position. Styles, comments and formulas are ignored
//! (formula cells yield their cached value).
//!
//! [`Sheet`]: sheetgen_core::Sheet

pub mod error;
pub mod reader;

pub use error::{XlsxError, XlsxResult};
pub use reader::{XlsxReader, XlsxWorkbook};
