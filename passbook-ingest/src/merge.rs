//! Continuation merging: collapse the per-line table layout of an extracted
//! statement into one row per real transaction.
//!
//! Extraction splits long payees over several lines (the extra lines carry no
//! amounts) and leaves "BALANCE CARRIED FORWARD" / "BALANCE BROUGHT FORWARD"
//! lines at every page break. The merger makes one forward pass:
//!
//! - a zero marker (outflow = inflow = balance = 0) folds its payee text into
//!   the next row and is dropped;
//! - a row without a date takes the date of the row above;
//! - "balance" rows are dropped, except the first and last row, which hold the
//!   opening and closing balance of the statement.

use chrono::NaiveDate;
use log::debug;
use passbook_core::error::Result;
use passbook_core::{StatementError, Transaction};

use crate::types::ParsedRow;

const BALANCE_MARKER: &str = "balance";

fn join_payee(prefix: &str, payee: &str) -> String {
    match (prefix.is_empty(), payee.is_empty()) {
        (true, _) => payee.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix} {payee}"),
    }
}

/// Fold continuation lines forward, fill dates and drop administrative
/// balance lines. Never mutates `rows`.
///
/// An inner balance row is only known to be inner once a later row shows up,
/// so it is held back until then. Continuation text it absorbed moves on to
/// the next real row instead of disappearing with it.
pub fn merge_continuations(rows: &[ParsedRow]) -> Result<Vec<Transaction>> {
    let mut merged: Vec<Transaction> = Vec::with_capacity(rows.len());
    let mut pending_payee = String::new();
    let mut last_date: Option<NaiveDate> = None;
    let mut held_balance: Option<(Transaction, String)> = None;

    for row in rows {
        let date = row.date.or(last_date);
        last_date = date;

        if row.is_zero_marker() {
            pending_payee = join_payee(&pending_payee, &row.payee);
            continue;
        }

        let date = date.ok_or_else(|| StatementError::MalformedDate {
            line: row.line,
            value: String::new(),
        })?;

        if let Some((dropped, carried)) = held_balance.take() {
            debug!("dropping inner balance row {:?}", dropped.payee);
            pending_payee = join_payee(&carried, &pending_payee);
        }

        let prefix = std::mem::take(&mut pending_payee);
        let txn = Transaction::new(
            date,
            join_payee(&prefix, &row.payee),
            row.outflow,
            row.inflow,
            row.balance,
        );

        if !merged.is_empty() && is_balance_row(&txn) {
            held_balance = Some((txn, prefix));
        } else {
            merged.push(txn);
        }
    }

    // The last row of the statement keeps its closing balance line
    if let Some((closing, _)) = held_balance {
        merged.push(closing);
    }

    if !pending_payee.is_empty() {
        debug!("dropping trailing continuation text {:?}", pending_payee);
    }

    Ok(merged)
}

fn is_balance_row(txn: &Transaction) -> bool {
    txn.payee.to_lowercase().contains(BALANCE_MARKER)
}
