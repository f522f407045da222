//! Load the recorded statement balances ledger (`Balances.csv`).
//!
//! Header: statement_date, opening_balance, closing_balance,
//! thismonth_closing_nextmonth_opening_reconciled,
//! stmt_balance_notebook_balance_reconciled
//!
//! The two trailing marker columns are filled in by hand (or by our
//! reconciliation report) and are ignored on load.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use log::warn;
use passbook_core::{BalanceRecord, parse_amount_text};
use std::io::Read;
use std::path::Path;

/// Recorded balances sorted by statement date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceLedger {
    records: Vec<BalanceRecord>,
}

impl BalanceLedger {
    pub fn new(mut records: Vec<BalanceRecord>) -> Self {
        records.sort_by_key(|r| r.statement_date);
        Self { records }
    }

    pub fn records(&self) -> &[BalanceRecord] {
        &self.records
    }

    /// Record for exactly this statement date
    pub fn get(&self, statement_date: NaiveDate) -> Option<&BalanceRecord> {
        self.records
            .binary_search_by_key(&statement_date, |r| r.statement_date)
            .ok()
            .map(|i| &self.records[i])
    }

    /// Latest record strictly before `statement_date`
    pub fn previous(&self, statement_date: NaiveDate) -> Option<&BalanceRecord> {
        let idx = self.records.partition_point(|r| r.statement_date < statement_date);
        idx.checked_sub(1).map(|i| &self.records[i])
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d/%m/%Y"))
        .ok()
}

/// Parse a balances ledger from any reader.
pub fn read_balances<R: Read>(reader: R) -> Result<BalanceLedger> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let record = result.with_context(|| format!("balances row {line}"))?;

        let date_str = record.get(0).unwrap_or("");
        if date_str.is_empty() {
            continue;
        }
        let statement_date = parse_date(date_str)
            .ok_or_else(|| anyhow!("balances row {line}: bad statement_date {date_str:?}"))?;

        let opening_raw = record.get(1).unwrap_or("");
        let closing_raw = record.get(2).unwrap_or("");
        if opening_raw.is_empty() || closing_raw.is_empty() {
            warn!("skipping balances row {line} ({date_str}): opening or closing balance is blank");
            continue;
        }

        let amount = |raw: &str, name: &str| {
            parse_amount_text(raw).ok_or_else(|| anyhow!("balances row {line}: bad {name} {raw:?}"))
        };

        records.push(BalanceRecord {
            statement_date,
            opening_balance: amount(opening_raw, "opening_balance")?,
            closing_balance: amount(closing_raw, "closing_balance")?,
        });
    }

    Ok(BalanceLedger::new(records))
}

/// Load `Balances.csv` from disk.
pub fn load_balances(path: impl AsRef<Path>) -> Result<BalanceLedger> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_balances(file).with_context(|| format!("parsing {}", path.display()))
}
