//! Folder layout of an account root:
//!
//!   <root>/Balances.csv
//!   <root>/payee_mapping.csv
//!   <root>/<year>/1-tabula-output/   tabula CSVs (input)
//!   <root>/<year>/2-cleaned/         <stem>_cleaned.csv (output)
//!   <root>/<year>/reconciliation.csv

use std::path::{Path, PathBuf};

use crate::config::Config;

const RECONCILIATION_FILE: &str = "reconciliation.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub tabula_dir: PathBuf,
    pub cleaned_dir: PathBuf,
    pub balances_file: PathBuf,
    pub payee_mapping: PathBuf,
    pub reconciliation_file: PathBuf,
}

fn under(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() { p.to_path_buf() } else { base.join(p) }
}

impl Layout {
    /// An empty `year` means the year folders are not used and everything
    /// lives directly under `root`.
    pub fn resolve(root: &Path, year: &str, cfg: &Config) -> Self {
        let year_dir = if year.trim().is_empty() {
            root.to_path_buf()
        } else {
            root.join(year.trim())
        };

        Self {
            tabula_dir: under(&year_dir, &cfg.paths.tabula_dir),
            cleaned_dir: under(&year_dir, &cfg.paths.cleaned_dir),
            balances_file: under(root, &cfg.paths.balances_file),
            payee_mapping: under(root, &cfg.paths.payee_mapping),
            reconciliation_file: year_dir.join(RECONCILIATION_FILE),
        }
    }
}
