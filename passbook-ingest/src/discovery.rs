//! Statement file discovery.
//!
//! Tabula output is organised as `<root>/<year>/1-tabula-output/**.csv`, one
//! file per statement, named with the statement date first:
//!   2021-01-25_statement.csv
//! Files produced by later stages (`_processed`, `_ynab`, `_cleaned`) are
//! skipped so re-runs never ingest their own output.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::warn;
use passbook_core::StatementFile;
use std::path::Path;
use walkdir::WalkDir;

const EXCLUDED_STEM_MARKERS: [&str; 3] = ["_processed", "_ynab", "_cleaned"];
const DATE_PREFIX_LEN: usize = 10;

/// Statement date from the fixed-width `YYYY-MM-DD` filename prefix
pub fn statement_date_from_filename(filename: &str) -> Option<NaiveDate> {
    let prefix = filename.get(..DATE_PREFIX_LEN)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn is_statement_csv(path: &Path) -> bool {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    is_csv && !EXCLUDED_STEM_MARKERS.iter().any(|m| stem.contains(*m))
}

/// Recursively enumerate statement CSVs under `dir`, sorted by statement date
/// then filename. Files without a date prefix are skipped with a warning.
pub fn discover_statements(dir: impl AsRef<Path>) -> Result<Vec<StatementFile>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if !entry.file_type().is_file() || !is_statement_csv(entry.path()) {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        match statement_date_from_filename(&filename) {
            Some(date) => files.push(StatementFile::new(date, filename, entry.path().to_path_buf())),
            None => warn!("skipping {}: no YYYY-MM-DD prefix", entry.path().display()),
        }
    }

    files.sort_by(|a, b| {
        a.statement_date
            .cmp(&b.statement_date)
            .then_with(|| a.filename.cmp(&b.filename))
    });
    Ok(files)
}
