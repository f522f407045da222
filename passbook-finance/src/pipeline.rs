//! Pipeline orchestrator: clean every discovered statement, then reconcile.
//!
//! Cleaning a file is pure and independent of every other file, so files run
//! on blocking worker tasks bounded by `jobs`. A file that fails to parse is
//! recorded as failed and the rest of the run carries on. Reconciliation runs
//! once all files are done because the continuity check needs statements in
//! date order.

use anyhow::Result;
use log::{info, warn};
use passbook_core::error::Result as StatementResult;
use passbook_core::{StatementFile, Transaction};
use passbook_ingest::{RawRow, merge_continuations, parse_rows, read_raw_csv};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::balances::BalanceLedger;
use crate::classifier::PayeeClassifier;
use crate::reconcile::{Reconciliation, reconcile_all};
use crate::writer::write_cleaned_csv;

/// Parse, merge and classify one statement's raw rows.
pub fn clean_statement(rows: &[RawRow], classifier: &PayeeClassifier) -> StatementResult<Vec<Transaction>> {
    let parsed = parse_rows(rows)?;
    let merged = merge_continuations(&parsed)?;
    Ok(merged.into_iter().map(|txn| classifier.apply(txn)).collect())
}

/// Per-file result of a pipeline run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatementOutcome {
    Cleaned {
        file: StatementFile,
        transactions: Vec<Transaction>,
    },
    Failed {
        file: StatementFile,
        error: String,
    },
}

impl StatementOutcome {
    pub fn file(&self) -> &StatementFile {
        match self {
            StatementOutcome::Cleaned { file, .. } | StatementOutcome::Failed { file, .. } => file,
        }
    }

    pub fn transactions(&self) -> Option<&[Transaction]> {
        match self {
            StatementOutcome::Cleaned { transactions, .. } => Some(transactions),
            StatementOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StatementOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Where `<stem>_cleaned.csv` files go; `None` skips writing
    pub cleaned_dir: Option<PathBuf>,
    /// Maximum files cleaned at once
    pub jobs: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            cleaned_dir: None,
            jobs: 4,
        }
    }
}

fn clean_file(file: &mut StatementFile, classifier: &PayeeClassifier, cleaned_dir: Option<&Path>) -> Result<Vec<Transaction>> {
    let rows = read_raw_csv(&file.source_path)?;
    let transactions = clean_statement(&rows, classifier)?;

    if let Some(dir) = cleaned_dir {
        let path = dir.join(file.cleaned_filename());
        write_cleaned_csv(&path, &transactions)?;
        file.cleaned_path = Some(path);
    }

    Ok(transactions)
}

/// Clean a single statement file, capturing any failure in the outcome.
pub fn process_statement(
    mut file: StatementFile,
    classifier: &PayeeClassifier,
    cleaned_dir: Option<&Path>,
) -> StatementOutcome {
    info!("processing {}", file.source_path.display());

    match clean_file(&mut file, classifier, cleaned_dir) {
        Ok(transactions) => {
            info!(
                "cleaned {} ({} transactions)",
                file.filename,
                transactions.len()
            );
            StatementOutcome::Cleaned { file, transactions }
        }
        Err(err) => {
            warn!("skipping {}: {:#}", file.filename, err);
            StatementOutcome::Failed {
                error: format!("{err:#}"),
                file,
            }
        }
    }
}

/// Clean all files concurrently. Outcomes come back sorted by statement date
/// then filename, one per input file.
pub async fn run_pipeline(
    files: Vec<StatementFile>,
    classifier: Arc<PayeeClassifier>,
    options: &PipelineOptions,
) -> Vec<StatementOutcome> {
    let semaphore = Arc::new(Semaphore::new(options.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for file in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await.ok();
        let classifier = Arc::clone(&classifier);
        let cleaned_dir = options.cleaned_dir.clone();
        let pending = file.clone();

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            process_statement(file, &classifier, cleaned_dir.as_deref())
        });
        handles.push((pending, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (file, handle) in handles {
        let outcome = handle.await.unwrap_or_else(|err| {
            warn!("worker for {} failed: {}", file.filename, err);
            StatementOutcome::Failed {
                error: format!("worker failed: {err}"),
                file,
            }
        });
        outcomes.push(outcome);
    }

    outcomes.sort_by(|a, b| {
        let (a, b) = (a.file(), b.file());
        a.statement_date
            .cmp(&b.statement_date)
            .then_with(|| a.filename.cmp(&b.filename))
    });
    outcomes
}

/// Reconcile every cleaned statement; failed files are not reconciled.
pub fn reconcile_outcomes(outcomes: &[StatementOutcome], ledger: &BalanceLedger) -> Vec<Reconciliation> {
    reconcile_all(
        outcomes
            .iter()
            .filter_map(|o| o.transactions().map(|txns| (o.file().statement_date, txns))),
        ledger,
    )
}

/// Everything a run produced, for printing or JSON output
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<StatementOutcome>,
    pub reconciliations: Vec<Reconciliation>,
}

impl RunReport {
    pub fn new(outcomes: Vec<StatementOutcome>, ledger: &BalanceLedger) -> Self {
        let reconciliations = reconcile_outcomes(&outcomes, ledger);
        Self {
            outcomes,
            reconciliations,
        }
    }

    pub fn cleaned_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn unreconciled_count(&self) -> usize {
        self.reconciliations.iter().filter(|r| !r.reconciled).count()
    }

    /// Transactions that no mapping rule matched, across all cleaned files
    pub fn uncategorized_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(StatementOutcome::transactions)
            .flatten()
            .filter(|t| !t.is_categorized())
            .count()
    }
}
