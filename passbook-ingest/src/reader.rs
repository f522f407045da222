//! Read header-less tabula CSV output into raw rows.

use anyhow::{Context, Result};
use csv::StringRecord;
use std::io::Read;
use std::path::Path;

use crate::types::RawRow;

fn field(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").to_string()
}

fn record_to_raw(record: &StringRecord) -> RawRow {
    RawRow {
        date: field(record, 0),
        transaction_type: field(record, 1),
        payee: field(record, 2),
        outflow: field(record, 3),
        inflow: field(record, 4),
        balance: field(record, 5),
    }
}

/// Read raw rows from any reader. Short rows are padded with empty fields and
/// extra trailing columns are ignored.
pub fn read_raw_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("reading row {}", i + 1))?;
        rows.push(record_to_raw(&record));
    }

    Ok(rows)
}

/// Read a tabula CSV file.
pub fn read_raw_csv(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_raw_rows(file).with_context(|| format!("parsing {}", path.display()))
}
