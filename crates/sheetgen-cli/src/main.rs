//! sheetgen CLI - compiles designer workbooks into client/server data tables

mod logging;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use sheetgen::{BuildOptions, EmitOptions};

#[derive(Parser)]
#[command(name = "sheetgen")]
#[command(
    author,
    version,
    about = "Compile .xlsx workbooks into client/server JSON and Lua tables"
)]
struct Cli {
    /// Directory searched recursively for .xlsx workbooks
    #[arg(long = "source_dir", default_value = "./excel")]
    source_dir: PathBuf,

    /// JSON output root (empty to disable JSON output)
    #[arg(long = "json_dir", default_value = "./json")]
    json_dir: String,

    /// Lua output root (empty to disable Lua output)
    #[arg(long = "lua_dir", default_value = "./lua")]
    lua_dir: String,

    /// Incremental build manifest
    #[arg(long = "record_file", default_value = sheetgen::DEFAULT_MANIFEST_PATH)]
    record_file: PathBuf,

    /// Write outputs under a per-workbook subdirectory
    #[arg(long = "nest_by_workbook")]
    nest_by_workbook: bool,

    /// Rebuild every workbook, ignoring the manifest
    #[arg(long)]
    force: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long = "log_level", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn build_options(&self) -> BuildOptions {
        BuildOptions {
            source_dir: self.source_dir.clone(),
            manifest_path: self.record_file.clone(),
            emit: EmitOptions::new(&self.json_dir, &self.lua_dir)
                .with_nest_by_workbook(self.nest_by_workbook),
            force: self.force,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let options = cli.build_options();
    let started = Instant::now();
    let report = sheetgen::run(options)
        .with_context(|| format!("Failed to build '{}'", cli.source_dir.display()))?;

    tracing::info!(
        processed = report.workbooks_processed,
        skipped = report.workbooks_skipped,
        failed = report.workbooks_failed,
        sheets = report.sheets_emitted,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "build finished"
    );
    Ok(())
}
