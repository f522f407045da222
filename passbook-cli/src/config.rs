use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "passbook.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub paths: PathsSection,
    pub run: RunSection,
}

/// Relative paths resolve against ROOT (balances, mapping) or ROOT/YEAR
/// (tabula and cleaned folders).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsSection {
    pub tabula_dir: PathBuf,
    pub cleaned_dir: PathBuf,
    pub balances_file: PathBuf,
    pub payee_mapping: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunSection {
    /// Statement files cleaned concurrently
    pub jobs: usize,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            tabula_dir: PathBuf::from("1-tabula-output"),
            cleaned_dir: PathBuf::from("2-cleaned"),
            balances_file: PathBuf::from("Balances.csv"),
            payee_mapping: PathBuf::from("payee_mapping.csv"),
        }
    }
}

impl Default for RunSection {
    fn default() -> Self {
        Self { jobs: 4 }
    }
}

pub fn default_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Load config from `path`, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}
