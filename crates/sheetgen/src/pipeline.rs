//! Workbook and sheet dispatch.
//!
//! Workbooks under the source root are built in parallel; inside each
//! workbook the visible sheets are decoded and written in parallel. A
//! workbook is recorded in the manifest only after all of its sheets have
//! been written.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use sheetgen_core::sheet::is_hidden_sheet;
use sheetgen_core::{decode_sheet, Sheet};
use sheetgen_emit::{EmitOptions, OutputWriter};
use sheetgen_xlsx::XlsxReader;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::manifest::{manifest_key, modified_nanos, Manifest, DEFAULT_MANIFEST_PATH};

/// Spreadsheet file extension picked up by discovery
pub const WORKBOOK_EXTENSION: &str = "xlsx";

/// File-name prefix of editor lock/temp files
pub const TEMP_FILE_PREFIX: &str = "~$";

/// File-name prefix of workbooks excluded from the build
pub const HIDDEN_FILE_PREFIX: &str = "#";

/// Build configuration
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Root of the workbook tree
    pub source_dir: PathBuf,
    /// Incremental build manifest
    pub manifest_path: PathBuf,
    /// Output roots and layout
    pub emit: EmitOptions,
    /// Rebuild every workbook regardless of the manifest
    pub force: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("./excel"),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            emit: EmitOptions::new("./json", "./lua"),
            force: false,
        }
    }
}

/// What a build did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Workbooks whose sheets were all written
    pub workbooks_processed: usize,
    /// Workbooks unchanged since the last build
    pub workbooks_skipped: usize,
    /// Workbooks that could not be opened (retried next run)
    pub workbooks_failed: usize,
    /// Sheets decoded and written
    pub sheets_emitted: usize,
}

#[derive(Debug, Default)]
struct Counters {
    processed: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
    sheets: AtomicUsize,
}

impl Counters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn report(&self) -> BuildReport {
        BuildReport {
            workbooks_processed: self.processed.load(Ordering::Relaxed),
            workbooks_skipped: self.skipped.load(Ordering::Relaxed),
            workbooks_failed: self.failed.load(Ordering::Relaxed),
            sheets_emitted: self.sheets.load(Ordering::Relaxed),
        }
    }
}

/// A workbook that needs building
#[derive(Debug, Clone)]
struct PendingWorkbook {
    path: PathBuf,
    /// Path as shown in diagnostics
    display: String,
    /// File name without extension, for nested output layouts
    stem: String,
    key: String,
    modified: i64,
}

/// Whether a path names a workbook the build should pick up
pub fn is_workbook_file(path: &Path) -> bool {
    let is_xlsx = path.extension().and_then(|e| e.to_str()) == Some(WORKBOOK_EXTENSION);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    is_xlsx && !name.starts_with(TEMP_FILE_PREFIX) && !name.starts_with(HIDDEN_FILE_PREFIX)
}

/// All workbook files under `source_dir`, in file-name order
pub fn discover_workbooks(source_dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_workbook_file(entry.path()) {
            found.push(entry.into_path());
        }
    }
    found
}

/// Runs builds against one manifest and output tree
#[derive(Debug)]
pub struct Builder {
    options: BuildOptions,
    writer: OutputWriter,
    manifest: Manifest,
}

impl Builder {
    /// Create a builder, loading the manifest named by the options
    pub fn new(options: BuildOptions) -> Self {
        let manifest = Manifest::load(&options.manifest_path);
        Self::with_manifest(options, manifest)
    }

    /// Create a builder over an already loaded manifest
    pub fn with_manifest(options: BuildOptions, manifest: Manifest) -> Self {
        Self {
            writer: OutputWriter::new(options.emit.clone()),
            options,
            manifest,
        }
    }

    /// Manifest as updated by the builds run so far
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Build every changed workbook, then save the manifest.
    ///
    /// Decode, sheet-read and output errors abort the build. A workbook that
    /// cannot be opened is logged and left out of the manifest. The report
    /// covers this run only.
    pub fn run(&self) -> Result<BuildReport> {
        let counters = Counters::default();
        let pending: Vec<PendingWorkbook> = discover_workbooks(&self.options.source_dir)
            .into_iter()
            .filter_map(|path| self.check(path, &counters))
            .collect();

        pending
            .par_iter()
            .try_for_each(|workbook| self.build_workbook(workbook, &counters))?;

        self.manifest.save()?;
        Ok(counters.report())
    }

    /// Stat a discovered workbook and decide whether it needs building
    fn check(&self, path: PathBuf, counters: &Counters) -> Option<PendingWorkbook> {
        let modified = match modified_nanos(&path) {
            Ok(modified) => modified,
            Err(e) => {
                log::warn!("cannot stat {}: {}", path.display(), e);
                Counters::bump(&counters.failed);
                return None;
            }
        };

        let key = manifest_key(&path);
        if !self.options.force && self.manifest.is_unchanged(&key, modified) {
            log::debug!("unchanged {}", path.display());
            Counters::bump(&counters.skipped);
            return None;
        }

        Some(PendingWorkbook {
            display: path.display().to_string(),
            stem: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            key,
            modified,
            path,
        })
    }

    fn build_workbook(&self, workbook: &PendingWorkbook, counters: &Counters) -> Result<()> {
        let sheets = match self.read_sheets(workbook, counters)? {
            Some(sheets) => sheets,
            None => return Ok(()),
        };

        sheets
            .par_iter()
            .try_for_each(|sheet| self.build_sheet(workbook, sheet, counters))?;

        self.manifest.record(workbook.key.clone(), workbook.modified);
        Counters::bump(&counters.processed);
        log::info!("built {} ({} sheets)", workbook.display, sheets.len());
        Ok(())
    }

    /// Read the visible sheets of a workbook; `None` if it cannot be opened.
    ///
    /// The archive is closed before returning.
    fn read_sheets(
        &self,
        workbook: &PendingWorkbook,
        counters: &Counters,
    ) -> Result<Option<Vec<Sheet>>> {
        let mut archive = match XlsxReader::open(&workbook.path) {
            Ok(archive) => archive,
            Err(e) => {
                log::error!("{} {}", workbook.display, e);
                Counters::bump(&counters.failed);
                return Ok(None);
            }
        };

        let names: Vec<String> = archive.sheet_names().map(str::to_string).collect();
        let mut sheets = Vec::with_capacity(names.len());
        for (index, name) in names.into_iter().enumerate() {
            if is_hidden_sheet(&name) {
                log::debug!("hidden sheet {} in {}", name, workbook.display);
                continue;
            }
            let sheet = archive
                .read_sheet(index)
                .map_err(|source| Error::SheetRead {
                    workbook: workbook.path.clone(),
                    sheet: name,
                    source,
                })?;
            sheets.push(sheet);
        }
        Ok(Some(sheets))
    }

    fn build_sheet(
        &self,
        workbook: &PendingWorkbook,
        sheet: &Sheet,
        counters: &Counters,
    ) -> Result<()> {
        let views = decode_sheet(&workbook.display, sheet)?;
        self.writer.write_sheet(&workbook.stem, sheet.name(), &views)?;
        Counters::bump(&counters.sheets);
        Ok(())
    }
}

/// Run a build with the given options
pub fn run(options: BuildOptions) -> Result<BuildReport> {
    Builder::new(options).run()
}
