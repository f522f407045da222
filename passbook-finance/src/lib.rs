//! passbook-finance: payee classification, balance ledger, reconciliation and
//! the statement pipeline

pub mod balances;
pub mod classifier;
pub mod payee_mapping;
pub mod pipeline;
pub mod reconcile;
pub mod writer;

pub use balances::{BalanceLedger, load_balances};
pub use classifier::{Classification, PayeeClassifier};
pub use payee_mapping::{PayeeMapping, PayeeRule, load_payee_mapping};
pub use pipeline::{PipelineOptions, RunReport, StatementOutcome, clean_statement, run_pipeline};
pub use reconcile::{Discrepancy, DiscrepancyKind, Reconciliation, reconcile_statement};
pub use writer::{write_cleaned_csv, write_reconciliation_csv};
