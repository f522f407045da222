use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use passbook_core::format_money;
use passbook_finance::pipeline::{PipelineOptions, RunReport, StatementOutcome, run_pipeline};
use passbook_finance::{PayeeClassifier, load_balances, write_reconciliation_csv};
use passbook_ingest::discover_statements;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod layout;

use layout::Layout;

#[derive(Parser, Debug)]
#[command(
    name = "passbook",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PASSBOOK_BUILD_SHA"), ")"),
    about = "Clean tabula-extracted bank statements and reconcile their balances"
)]
struct Cli {
    /// Account root holding Balances.csv, the payee mapping and year folders
    #[arg(default_value = "./data")]
    root: PathBuf,

    /// Year folder to process ("" processes the root itself)
    #[arg(default_value = "2021")]
    year: String,

    /// Config file (default: <ROOT>/passbook.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Payee mapping CSV, overriding the config
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Balances ledger CSV, overriding the config
    #[arg(long)]
    balances: Option<PathBuf>,

    /// Statement files cleaned concurrently
    #[arg(long)]
    jobs: Option<usize>,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Clean and reconcile without writing any files
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config::default_config_path(&cli.root));
    let cfg = config::load_config(&config_path)?;

    let mut layout = Layout::resolve(&cli.root, &cli.year, &cfg);
    if let Some(mapping) = cli.mapping.clone() {
        layout.payee_mapping = mapping;
    }
    if let Some(balances) = cli.balances.clone() {
        layout.balances_file = balances;
    }
    let jobs = cli.jobs.unwrap_or(cfg.run.jobs);

    let report = process(&layout, jobs, cli.dry_run).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.failed_count() > 0 {
        bail!("{} statement file(s) could not be cleaned", report.failed_count());
    }

    Ok(())
}

async fn process(layout: &Layout, jobs: usize, dry_run: bool) -> Result<RunReport> {
    info!("tabula path: {}", layout.tabula_dir.display());

    let files = discover_statements(&layout.tabula_dir)
        .with_context(|| format!("discovering statements in {}", layout.tabula_dir.display()))?;
    if files.is_empty() {
        bail!("no statement CSVs found in {}", layout.tabula_dir.display());
    }

    let classifier = PayeeClassifier::from_csv(&layout.payee_mapping)
        .context("loading payee mapping (pass --mapping <path>)")?;
    let ledger = load_balances(&layout.balances_file)
        .context("loading balances (pass --balances <path>)")?;

    info!(
        "{} statements, {} payee rules, {} balance records",
        files.len(),
        classifier.mapping().len(),
        ledger.records().len()
    );

    let options = PipelineOptions {
        cleaned_dir: (!dry_run).then(|| layout.cleaned_dir.clone()),
        jobs,
    };
    let outcomes = run_pipeline(files, Arc::new(classifier), &options).await;
    let report = RunReport::new(outcomes, &ledger);

    if !dry_run {
        write_reconciliation_csv(&layout.reconciliation_file, &report.reconciliations, &ledger)?;
        info!("wrote {}", layout.reconciliation_file.display());
    }

    Ok(report)
}

fn print_report(report: &RunReport) {
    println!("# Statements\n");
    for outcome in &report.outcomes {
        match outcome {
            StatementOutcome::Cleaned { file, transactions } => {
                let outflow: Decimal = transactions.iter().map(|t| t.outflow).sum();
                let inflow: Decimal = transactions.iter().map(|t| t.inflow).sum();
                let target = file
                    .cleaned_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(dry run)".to_string());
                println!(
                    "- [ok] {} | {} transactions | out={} in={} | {}",
                    file.filename,
                    transactions.len(),
                    format_money(outflow),
                    format_money(inflow),
                    target
                );
            }
            StatementOutcome::Failed { file, error } => {
                println!("- [FAILED] {} | {}", file.filename, error);
            }
        }
    }

    println!("\n# Reconciliation\n");
    for rec in &report.reconciliations {
        println!("{}", rec.report());
    }

    println!(
        "\nCleaned: {} | Failed: {} | Unreconciled: {} | Uncategorized transactions: {}",
        report.cleaned_count(),
        report.failed_count(),
        report.unreconciled_count(),
        report.uncategorized_count()
    );
}
