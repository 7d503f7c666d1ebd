//! # sheetgen-emit
//!
//! Serialisers for decoded sheets, and the output tree they are written to.
//!
//! - [`json`] - compact JSON documents
//! - [`lua`] - `return { ... }` Lua table scripts with sorted keys
//! - [`OutputWriter`] - writes both audience views of a sheet under each
//!   enabled output root

pub mod json;
pub mod lua;

mod error;
mod options;
mod writer;

pub use error::{EmitError, EmitResult};
pub use options::{EmitOptions, Format};
pub use writer::OutputWriter;
