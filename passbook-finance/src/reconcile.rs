//! Statement reconciliation against the recorded balances ledger.
//!
//! A statement reconciles when its first and last balances equal the recorded
//! opening and closing balances and its opening balance equals the previous
//! statement's closing balance. Running-balance breaks inside the statement
//! are reported for review but do not fail reconciliation. Nothing here
//! returns an error: extracted data is known to be imperfect and every
//! mismatch is left for a human to look at.

use chrono::NaiveDate;
use passbook_core::{BalanceRecord, Transaction, format_money};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::balances::BalanceLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// No transactions survived cleaning
    EmptyStatement,
    /// No recorded balances for this statement date
    MissingBalanceRecord,
    OpeningBalance,
    ClosingBalance,
    /// Opening balance differs from the previous statement's closing balance
    Continuity,
    /// Stated balance disagrees with the balance computed from amounts
    RunningBalance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    pub date: Option<NaiveDate>,
    pub expected: Option<Decimal>,
    pub actual: Option<Decimal>,
    /// actual - expected
    pub difference: Option<Decimal>,
}

impl Discrepancy {
    fn amounts(kind: DiscrepancyKind, date: Option<NaiveDate>, expected: Decimal, actual: Decimal) -> Self {
        Self {
            kind,
            date,
            expected: Some(expected),
            actual: Some(actual),
            difference: Some(actual - expected),
        }
    }

    fn bare(kind: DiscrepancyKind) -> Self {
        Self {
            kind,
            date: None,
            expected: None,
            actual: None,
            difference: None,
        }
    }

    /// Running-balance breaks are informational and do not fail a statement
    pub fn is_blocking(&self) -> bool {
        self.kind != DiscrepancyKind::RunningBalance
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            DiscrepancyKind::EmptyStatement => "no transactions after cleaning",
            DiscrepancyKind::MissingBalanceRecord => "no recorded balances for this statement",
            DiscrepancyKind::OpeningBalance => "opening balance",
            DiscrepancyKind::ClosingBalance => "closing balance",
            DiscrepancyKind::Continuity => "opening vs previous closing balance",
            DiscrepancyKind::RunningBalance => "running balance",
        };
        write!(f, "{label}")?;
        if let Some(date) = self.date {
            write!(f, " on {date}")?;
        }
        if let (Some(expected), Some(actual), Some(diff)) =
            (self.expected, self.actual, self.difference)
        {
            write!(
                f,
                ": expected {}, actual {} (difference {})",
                format_money(expected),
                format_money(actual),
                format_money(diff)
            )?;
        }
        Ok(())
    }
}

/// Outcome of reconciling one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub statement_date: NaiveDate,
    /// First and last balances match the recorded opening/closing balances
    pub statement_reconciled: bool,
    /// Opening balance matches the previous statement's closing balance
    pub continuity_reconciled: bool,
    pub reconciled: bool,
    pub discrepancies: Vec<Discrepancy>,
}

impl Reconciliation {
    /// Human-readable report, one line per discrepancy
    pub fn report(&self) -> String {
        let status = if self.reconciled { "reconciled" } else { "NOT RECONCILED" };
        let mut out = format!("{}: {}", self.statement_date, status);
        for d in &self.discrepancies {
            out.push_str("\n  - ");
            out.push_str(&d.to_string());
        }
        out
    }
}

/// Compare stated balances with balances computed from the amounts. Blank
/// (zero) balances are intra-day lines and only carry the computation forward.
pub fn running_balance_breaks(transactions: &[Transaction]) -> Vec<Discrepancy> {
    let Some((first, rest)) = transactions.split_first() else {
        return Vec::new();
    };

    let mut computed = first.balance;
    let mut breaks = Vec::new();
    for txn in rest {
        computed += txn.net_amount();
        if txn.balance.is_zero() {
            continue;
        }
        if txn.balance != computed {
            breaks.push(Discrepancy::amounts(
                DiscrepancyKind::RunningBalance,
                Some(txn.date),
                computed,
                txn.balance,
            ));
        }
        computed = txn.balance;
    }
    breaks
}

/// Reconcile one cleaned statement against its recorded balances.
///
/// `previous` is the record of the statement before this one; when there is
/// none, continuity holds trivially.
pub fn reconcile_statement(
    statement_date: NaiveDate,
    transactions: &[Transaction],
    record: Option<&BalanceRecord>,
    previous: Option<&BalanceRecord>,
) -> Reconciliation {
    let mut discrepancies = Vec::new();

    match (transactions.first(), transactions.last()) {
        (Some(first), Some(last)) => {
            if let Some(record) = record {
                if first.balance != record.opening_balance {
                    discrepancies.push(Discrepancy::amounts(
                        DiscrepancyKind::OpeningBalance,
                        Some(first.date),
                        record.opening_balance,
                        first.balance,
                    ));
                }
                if last.balance != record.closing_balance {
                    discrepancies.push(Discrepancy::amounts(
                        DiscrepancyKind::ClosingBalance,
                        Some(last.date),
                        record.closing_balance,
                        last.balance,
                    ));
                }
            }
        }
        _ => discrepancies.push(Discrepancy::bare(DiscrepancyKind::EmptyStatement)),
    }

    if record.is_none() {
        discrepancies.push(Discrepancy::bare(DiscrepancyKind::MissingBalanceRecord));
    }

    let statement_reconciled = discrepancies.is_empty();

    let continuity_reconciled = match (record, previous) {
        (Some(record), Some(prev)) if record.opening_balance != prev.closing_balance => {
            discrepancies.push(Discrepancy::amounts(
                DiscrepancyKind::Continuity,
                Some(prev.statement_date),
                prev.closing_balance,
                record.opening_balance,
            ));
            false
        }
        (None, _) => false,
        _ => true,
    };

    discrepancies.extend(running_balance_breaks(transactions));

    Reconciliation {
        statement_date,
        statement_reconciled,
        continuity_reconciled,
        reconciled: statement_reconciled && continuity_reconciled,
        discrepancies,
    }
}

/// Reconcile a set of cleaned statements, in statement-date order, using the
/// ledger for both the statement's own record and its predecessor.
pub fn reconcile_all<'a, I>(statements: I, ledger: &BalanceLedger) -> Vec<Reconciliation>
where
    I: IntoIterator<Item = (NaiveDate, &'a [Transaction])>,
{
    let mut items: Vec<_> = statements.into_iter().collect();
    items.sort_by_key(|(date, _)| *date);

    items
        .into_iter()
        .map(|(date, txns)| reconcile_statement(date, txns, ledger.get(date), ledger.previous(date)))
        .collect()
}
