use chrono::NaiveDate;
use passbook_finance::pipeline::{PipelineOptions, RunReport, StatementOutcome, run_pipeline};
use passbook_finance::reconcile::DiscrepancyKind;
use passbook_finance::{PayeeClassifier, load_balances};
use passbook_ingest::discover_statements;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

fn testdata() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("testdata")
}

fn tabula_dir() -> PathBuf {
    testdata().join("2021").join("1-tabula-output")
}

fn classifier() -> Arc<PayeeClassifier> {
    Arc::new(PayeeClassifier::from_csv(testdata().join("payee_mapping.csv")).unwrap())
}

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

async fn run(cleaned_dir: Option<PathBuf>) -> Vec<StatementOutcome> {
    let files = discover_statements(tabula_dir()).unwrap();
    let options = PipelineOptions { cleaned_dir, jobs: 2 };
    run_pipeline(files, classifier(), &options).await
}

#[test]
fn test_discovery_skips_processed_output() {
    let files = discover_statements(tabula_dir()).unwrap();
    let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "2021-01-25_statement.csv",
            "2021-02-25_statement.csv",
            "2021-03-25_statement.csv",
        ]
    );
}

/// A malformed file fails on its own; the other statements are still cleaned.
#[tokio::test]
async fn test_failed_file_does_not_stop_run() {
    let out = tempfile::tempdir().unwrap();
    let outcomes = run(Some(out.path().to_path_buf())).await;

    assert_eq!(outcomes.len(), 3);
    assert!(!outcomes[0].is_failed());
    assert!(!outcomes[1].is_failed());

    match &outcomes[2] {
        StatementOutcome::Failed { file, error } => {
            assert_eq!(file.statement_date, date(2021, 3, 25));
            assert!(error.contains("malformed amount"), "unexpected error: {error}");
            assert!(file.cleaned_path.is_none());
        }
        other => panic!("expected March to fail, got {other:?}"),
    }

    assert!(out.path().join("2021-01-25_statement_cleaned.csv").exists());
    assert!(out.path().join("2021-02-25_statement_cleaned.csv").exists());
    assert!(!out.path().join("2021-03-25_statement_cleaned.csv").exists());
}

#[tokio::test]
async fn test_january_is_merged_and_classified() {
    let outcomes = run(None).await;
    let jan = outcomes[0].transactions().unwrap();

    let payees: Vec<_> = jan.iter().map(|t| t.payee.as_str()).collect();
    assert_eq!(
        payees,
        vec![
            "BALANCE BROUGHT FORWARD",
            "Council Tax",
            "Tesco",
            "Amazon",
            "Salary",
            "BALANCE CARRIED FORWARD",
        ]
    );

    // Forward-filled dates
    assert_eq!(jan[2].date, date(2021, 1, 4));
    assert_eq!(jan[4].date, date(2021, 1, 26));
    assert_eq!(jan[5].date, date(2021, 1, 26));

    assert_eq!(jan[3].outflow, d("45.00"));
    assert_eq!(jan[4].inflow, d("2000.00"));
    assert_eq!(jan[4].category, "Income");
    assert!(!jan[0].is_categorized());
    assert!(jan.iter().all(|t| !t.is_zero_marker()));

    // Dry run writes nothing
    assert!(outcomes[0].file().cleaned_path.is_none());
}

#[tokio::test]
async fn test_reconciliation_across_statements() {
    let outcomes = run(None).await;
    let ledger = load_balances(testdata().join("Balances.csv")).unwrap();
    let report = RunReport::new(outcomes, &ledger);

    assert_eq!(report.cleaned_count(), 2);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.reconciliations.len(), 2);

    let jan = &report.reconciliations[0];
    assert_eq!(jan.statement_date, date(2021, 1, 25));
    assert!(jan.reconciled, "{}", jan.report());

    let feb = &report.reconciliations[1];
    assert!(!feb.reconciled);
    assert!(feb.continuity_reconciled);
    assert_eq!(feb.discrepancies.len(), 1);
    assert_eq!(feb.discrepancies[0].kind, DiscrepancyKind::ClosingBalance);
    assert_eq!(feb.discrepancies[0].difference, Some(d("-88.69")));
    assert_eq!(report.unreconciled_count(), 1);
}

#[tokio::test]
async fn test_cleaned_csv_round_trips_through_reader() {
    let out = tempfile::tempdir().unwrap();
    let outcomes = run(Some(out.path().to_path_buf())).await;

    let path = outcomes[1].file().cleaned_path.clone().unwrap();
    let text = std::fs::read_to_string(path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "date,payee,outflow,inflow,balance,category");
    assert_eq!(lines[2], "2021-02-03,Costa Coffee,3.20,0.00,2819.30,Eating Out");
    assert_eq!(lines[3], "2021-02-10,Amazon Prime,7.99,0.00,2811.31,Subscriptions");
    assert_eq!(lines.len(), 5);
}

#[tokio::test]
async fn test_report_serializes_outcome_status() {
    let outcomes = run(None).await;
    let ledger = load_balances(testdata().join("Balances.csv")).unwrap();
    let report = RunReport::new(outcomes, &ledger);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcomes"][0]["status"], "cleaned");
    assert_eq!(json["outcomes"][2]["status"], "failed");
    assert_eq!(json["reconciliations"][1]["discrepancies"][0]["kind"], "closing_balance");
}
