use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row exactly as the table extractor wrote it. Every column is text and
/// any of them may be empty, malformed or a continuation fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub date: String,
    pub transaction_type: String,
    pub payee: String,
    pub outflow: String,
    pub inflow: String,
    pub balance: String,
}

impl RawRow {
    pub fn new(
        date: &str,
        transaction_type: &str,
        payee: &str,
        outflow: &str,
        inflow: &str,
        balance: &str,
    ) -> Self {
        Self {
            date: date.to_string(),
            transaction_type: transaction_type.to_string(),
            payee: payee.to_string(),
            outflow: outflow.to_string(),
            inflow: inflow.to_string(),
            balance: balance.to_string(),
        }
    }
}

/// Typed row before continuation merging. `date` is `None` for continuation
/// lines that must inherit the date of the row above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRow {
    /// 1-based line in the source CSV
    pub line: usize,
    pub date: Option<NaiveDate>,
    pub payee: String,
    pub outflow: Decimal,
    pub inflow: Decimal,
    pub balance: Decimal,
}

impl ParsedRow {
    pub fn is_zero_marker(&self) -> bool {
        passbook_core::is_zero_marker(self.outflow, self.inflow, self.balance)
    }
}
