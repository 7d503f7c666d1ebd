//! Output tree writer

use std::fs;
use std::path::{Path, PathBuf};

use sheetgen_core::{Audience, SheetViews};

use crate::error::{EmitError, EmitResult};
use crate::options::{EmitOptions, Format};

/// Writes decoded sheets under the configured output roots.
///
/// For a sheet `S` the layout is `<root>/<audience>/S.<ext>`, or
/// `<root>/<audience>/<workbook>/S.<ext>` when nesting by workbook.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    options: EmitOptions,
}

impl OutputWriter {
    pub fn new(options: EmitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Where one view of a sheet goes, or `None` if the format is disabled
    pub fn output_path(
        &self,
        format: Format,
        audience: Audience,
        workbook: &str,
        sheet: &str,
    ) -> Option<PathBuf> {
        let root = self.options.root(format)?;
        Some(self.path_under(root, format, audience, workbook, sheet))
    }

    fn path_under(
        &self,
        root: &Path,
        format: Format,
        audience: Audience,
        workbook: &str,
        sheet: &str,
    ) -> PathBuf {
        let mut path = root.join(audience.dir_name());
        if self.options.nest_by_workbook {
            path.push(workbook);
        }
        path.push(format!("{}.{}", sheet, format.extension()));
        path
    }

    /// Write both views of a sheet in every enabled format.
    ///
    /// Returns the files written.
    pub fn write_sheet(
        &self,
        workbook: &str,
        sheet: &str,
        views: &SheetViews,
    ) -> EmitResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (format, root) in self.options.enabled() {
            for audience in Audience::ALL {
                let path = self.path_under(root, format, audience, workbook, sheet);
                let content = format.render(views.view(audience))?;
                write_file(&path, content.as_bytes())?;
                written.push(path);
            }
        }
        log::debug!("wrote {} files for sheet {}", written.len(), sheet);
        Ok(written)
    }
}

fn write_file(path: &Path, content: &[u8]) -> EmitResult<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| EmitError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| EmitError::Write {
        path: path.to_path_buf(),
        source,
    })
}
