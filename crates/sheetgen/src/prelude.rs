//! Prelude module - common imports for sheetgen users
//!
//! ```rust
//! use sheetgen::prelude::*;
//! ```

pub use crate::{
    // Build
    BuildOptions,
    BuildReport,
    Builder,
    // Output
    EmitOptions,
    Format,
    // Decoding
    Audience,
    Record,
    Sheet,
    SheetViews,
    TypeTag,
    Value,
    // Reading
    XlsxReader,
};
