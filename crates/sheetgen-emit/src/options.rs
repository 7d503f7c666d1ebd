//! Emit options

use std::path::{Path, PathBuf};

use sheetgen_core::Record;

use crate::error::EmitResult;
use crate::{json, lua};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// JSON document
    Json,
    /// Lua table script
    Lua,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Json, Format::Lua];

    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Lua => "lua",
        }
    }

    /// Serialise a record sequence in this format
    pub fn render(&self, records: &[Record]) -> EmitResult<String> {
        match self {
            Format::Json => json::to_string(records),
            Format::Lua => Ok(lua::to_string(records)),
        }
    }
}

/// Where and how outputs are written
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Root of the JSON tree; `None` disables JSON output
    pub json_dir: Option<PathBuf>,
    /// Root of the Lua tree; `None` disables Lua output
    pub lua_dir: Option<PathBuf>,
    /// Insert a `<workbook>/` directory below each audience directory
    pub nest_by_workbook: bool,
}

impl EmitOptions {
    /// Build options from root paths; an empty path disables that format
    pub fn new<J: Into<PathBuf>, L: Into<PathBuf>>(json_dir: J, lua_dir: L) -> Self {
        Self {
            json_dir: non_empty(json_dir.into()),
            lua_dir: non_empty(lua_dir.into()),
            nest_by_workbook: false,
        }
    }

    /// Set workbook nesting
    pub fn with_nest_by_workbook(mut self, nest: bool) -> Self {
        self.nest_by_workbook = nest;
        self
    }

    /// Root directory for a format, if that format is enabled
    pub fn root(&self, format: Format) -> Option<&Path> {
        match format {
            Format::Json => self.json_dir.as_deref(),
            Format::Lua => self.lua_dir.as_deref(),
        }
    }

    /// Enabled formats with their roots
    pub fn enabled(&self) -> impl Iterator<Item = (Format, &Path)> {
        Format::ALL
            .into_iter()
            .filter_map(|format| self.root(format).map(|root| (format, root)))
    }
}

fn non_empty(path: PathBuf) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}
