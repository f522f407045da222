//! Ledger record types shared by the ingest, finance and CLI crates

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One cleaned statement line: a dated transaction with its running balance.
///
/// Field order matches the cleaned CSV header
/// `date,payee,outflow,inflow,balance,category`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Posting date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Display payee; the raw extracted text until classification
    pub payee: String,
    /// Money leaving the account, 0 when not an outflow
    pub outflow: Decimal,
    /// Money entering the account, 0 when not an inflow
    pub inflow: Decimal,
    /// Running balance after this line, 0 when extraction left it blank
    pub balance: Decimal,
    /// Spending category, empty while unresolved
    #[serde(default)]
    pub category: String,
}

impl Transaction {
    /// Create an unclassified transaction
    pub fn new(
        date: NaiveDate,
        payee: impl Into<String>,
        outflow: Decimal,
        inflow: Decimal,
        balance: Decimal,
    ) -> Self {
        Self {
            date,
            payee: payee.into(),
            outflow,
            inflow,
            balance,
            category: String::new(),
        }
    }

    /// Builder-style category setter
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// A zero marker carries no amounts at all: it is a payee continuation
    /// line or extraction noise, never a real transaction.
    pub fn is_zero_marker(&self) -> bool {
        is_zero_marker(self.outflow, self.inflow, self.balance)
    }

    /// Net effect on the running balance (inflow - outflow)
    pub fn net_amount(&self) -> Decimal {
        self.inflow - self.outflow
    }

    pub fn is_categorized(&self) -> bool {
        !self.category.is_empty()
    }
}

/// Shared zero-marker predicate for typed rows that are not yet transactions.
pub fn is_zero_marker(outflow: Decimal, inflow: Decimal, balance: Decimal) -> bool {
    outflow.is_zero() && inflow.is_zero() && balance.is_zero()
}

/// Recorded opening/closing balances for one statement period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceRecord {
    pub statement_date: NaiveDate,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
}

/// A statement CSV produced by the table extractor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatementFile {
    /// Nominal statement date, taken from the file name prefix
    pub statement_date: NaiveDate,
    pub filename: String,
    pub source_path: PathBuf,
    /// Set once the cleaned CSV has been written
    pub cleaned_path: Option<PathBuf>,
}

impl StatementFile {
    pub fn new(statement_date: NaiveDate, filename: impl Into<String>, source_path: PathBuf) -> Self {
        Self {
            statement_date,
            filename: filename.into(),
            source_path,
            cleaned_path: None,
        }
    }

    /// File name of the cleaned output: `<stem>_cleaned.csv`
    pub fn cleaned_filename(&self) -> String {
        let stem = self
            .source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.filename.trim_end_matches(".csv").to_string());
        format!("{stem}_cleaned.csv")
    }
}
