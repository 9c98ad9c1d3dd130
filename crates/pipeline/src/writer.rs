//! Persisting frames and reports.

use crate::report::DataReport;
use lob_core::{DataFrame, Result};
use polars::prelude::{CsvWriter, SerWriter};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// File name of the JSON data report.
pub const REPORT_FILE_NAME: &str = "data_report.json";

/// Write `df` as `<output_dir>/<filename>`, creating the directory if
/// needed. Returns the path written.
pub fn write_table(df: &DataFrame, output_dir: impl AsRef<Path>, filename: &str) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(filename);
    write_csv(df, &path)?;
    Ok(path)
}

/// Write `df` to `path` with a header row and no index column. Missing
/// cells are empty fields.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    if df.width() == 0 {
        return Ok(());
    }
    let mut df = df.clone();
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

/// Write the data report as pretty JSON into `output_dir`.
pub fn write_report(report: &DataReport, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(REPORT_FILE_NAME);
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(path)
}
