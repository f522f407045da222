//! CSV output: cleaned statements and the reconciliation summary.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use passbook_core::{Transaction, format_money};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::balances::BalanceLedger;
use crate::reconcile::Reconciliation;

/// Write cleaned transactions with header
/// `date,payee,outflow,inflow,balance,category`.
pub fn write_transactions<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for txn in transactions {
        wtr.serialize(CleanedRow::from(txn))?;
    }
    if transactions.is_empty() {
        wtr.write_record(["date", "payee", "outflow", "inflow", "balance", "category"])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_cleaned_csv(path: impl AsRef<Path>, transactions: &[Transaction]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_transactions(file, transactions).with_context(|| format!("write {}", path.display()))
}

#[derive(Serialize)]
struct CleanedRow<'a> {
    date: NaiveDate,
    payee: &'a str,
    outflow: String,
    inflow: String,
    balance: String,
    category: &'a str,
}

impl<'a> From<&'a Transaction> for CleanedRow<'a> {
    fn from(txn: &'a Transaction) -> Self {
        Self {
            date: txn.date,
            payee: &txn.payee,
            outflow: format_money(txn.outflow),
            inflow: format_money(txn.inflow),
            balance: format_money(txn.balance),
            category: &txn.category,
        }
    }
}

/// Balances ledger row with the two reconciliation marker columns filled in
#[derive(Debug, Serialize)]
struct ReconciliationRow {
    statement_date: NaiveDate,
    opening_balance: String,
    closing_balance: String,
    thismonth_closing_nextmonth_opening_reconciled: bool,
    stmt_balance_notebook_balance_reconciled: bool,
}

/// Write the reconciliation summary in the balances-ledger layout. Statements
/// without a ledger record are left out; they show up in the run report.
pub fn write_reconciliation<W: Write>(
    writer: W,
    results: &[Reconciliation],
    ledger: &BalanceLedger,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut wrote_any = false;
    for result in results {
        let Some(record) = ledger.get(result.statement_date) else {
            continue;
        };
        wtr.serialize(ReconciliationRow {
            statement_date: record.statement_date,
            opening_balance: format_money(record.opening_balance),
            closing_balance: format_money(record.closing_balance),
            thismonth_closing_nextmonth_opening_reconciled: result.continuity_reconciled,
            stmt_balance_notebook_balance_reconciled: result.statement_reconciled,
        })?;
        wrote_any = true;
    }
    if !wrote_any {
        wtr.write_record([
            "statement_date",
            "opening_balance",
            "closing_balance",
            "thismonth_closing_nextmonth_opening_reconciled",
            "stmt_balance_notebook_balance_reconciled",
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_reconciliation_csv(
    path: impl AsRef<Path>,
    results: &[Reconciliation],
    ledger: &BalanceLedger,
) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_reconciliation(file, results, ledger).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile_statement;
    use passbook_core::BalanceRecord;
    use rust_decimal::Decimal;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
    }

    #[test]
    fn test_cleaned_csv_layout() {
        let txns = vec![
            Transaction::new(date(25), "Tesco", Decimal::new(1250, 2), Decimal::ZERO, Decimal::new(98750, 2))
                .with_category("Groceries"),
            Transaction::new(date(26), "EXPRESS SALARY", Decimal::ZERO, Decimal::new(2000, 0), Decimal::new(298750, 2)),
        ];
        let mut buf = Vec::new();
        write_transactions(&mut buf, &txns).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "date,payee,outflow,inflow,balance,category");
        assert_eq!(lines[1], "2021-01-25,Tesco,12.50,0.00,987.50,Groceries");
        assert_eq!(lines[2], "2021-01-26,EXPRESS SALARY,0.00,2000.00,2987.50,");
    }

    #[test]
    fn test_empty_statement_still_gets_header() {
        let mut buf = Vec::new();
        write_transactions(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim(), "date,payee,outflow,inflow,balance,category");
    }

    #[test]
    fn test_reconciliation_csv_fills_marker_columns() {
        let rec = BalanceRecord {
            statement_date: date(25),
            opening_balance: Decimal::new(100, 0),
            closing_balance: Decimal::new(250, 0),
        };
        let ledger = BalanceLedger::new(vec![rec]);
        let txns = vec![
            Transaction::new(date(1), "BALANCE BROUGHT FORWARD", Decimal::ZERO, Decimal::ZERO, Decimal::new(100, 0)),
            Transaction::new(date(20), "Salary", Decimal::ZERO, Decimal::new(150, 0), Decimal::new(250, 0)),
        ];
        let result = reconcile_statement(date(25), &txns, Some(&rec), None);

        let mut buf = Vec::new();
        write_reconciliation(&mut buf, &[result], &ledger).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "statement_date,opening_balance,closing_balance,thismonth_closing_nextmonth_opening_reconciled,stmt_balance_notebook_balance_reconciled"
        );
        assert_eq!(lines[1], "2021-01-25,100.00,250.00,true,true");
    }
}
