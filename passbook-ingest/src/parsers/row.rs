//! Row parser for tabula-extracted statement tables.
//!
//! Expected extracted rows (date, type, payee, outflow, inflow, balance):
//!   25-JAN-21,DEB,TESCO STORES,12.50,,987.50
//!   ,,EXPRESS,,,
//!   26-JAN-21,CR,SALARY,,"2,000.00","2,987.50"

use chrono::NaiveDate;
use passbook_core::StatementError;
use passbook_core::error::Result;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

use crate::types::{ParsedRow, RawRow};

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<day>\d{1,2})[-/ ](?P<mon>[A-Za-z]{3})[-/ ](?P<year>\d{2})$")
        .expect("date pattern is valid")
});

fn month_from_abbrev(mon: &str) -> Option<u32> {
    let month = match mon.to_ascii_uppercase().as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parse a `DD-MON-YY` statement date, e.g. "25-JAN-21" -> 2021-01-25.
///
/// Empty text is a continuation row and yields `Ok(None)`.
pub fn parse_statement_date(text: &str, line: usize) -> Result<Option<NaiveDate>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let malformed = || StatementError::MalformedDate {
        line,
        value: text.to_string(),
    };

    let caps = DATE_RE.captures(text).ok_or_else(malformed)?;
    let day: u32 = caps["day"].parse().map_err(|_| malformed())?;
    let month = month_from_abbrev(&caps["mon"]).ok_or_else(malformed)?;
    let year: i32 = caps["year"].parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(2000 + year, month, day)
        .map(Some)
        .ok_or_else(malformed)
}

/// Parse one amount column; `field` names the column for error reports.
pub fn parse_amount(text: &str, field: &'static str, line: usize) -> Result<Decimal> {
    passbook_core::parse_amount_text(text).ok_or_else(|| StatementError::MalformedAmount {
        line,
        field,
        value: text.trim().to_string(),
    })
}

/// Parse an outflow or inflow column. The direction lives in which column the
/// amount sits in, so a signed value is malformed.
fn parse_unsigned_amount(text: &str, field: &'static str, line: usize) -> Result<Decimal> {
    let amount = parse_amount(text, field, line)?;
    if amount < Decimal::ZERO {
        return Err(StatementError::MalformedAmount {
            line,
            field,
            value: text.trim().to_string(),
        });
    }
    Ok(amount)
}

/// Turn one raw extracted row into a typed row. The transaction type column
/// is not used downstream.
pub fn parse_row(line: usize, raw: &RawRow) -> Result<ParsedRow> {
    Ok(ParsedRow {
        line,
        date: parse_statement_date(&raw.date, line)?,
        payee: raw.payee.trim().to_string(),
        outflow: parse_unsigned_amount(&raw.outflow, "outflow", line)?,
        inflow: parse_unsigned_amount(&raw.inflow, "inflow", line)?,
        balance: parse_amount(&raw.balance, "balance", line)?,
    })
}

/// Parse every row of a statement, failing on the first malformed field.
pub fn parse_rows(rows: &[RawRow]) -> Result<Vec<ParsedRow>> {
    rows.iter()
        .enumerate()
        .map(|(i, raw)| parse_row(i + 1, raw))
        .collect()
}
