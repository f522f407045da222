//! Load the payee mapping table.
//!
//! The mapping CSV has a header row and one rule per line:
//!   payee, repl, category
//!   amzn, Amazon, Shopping
//!   tesco, Tesco, Groceries
//! Rule order matters: the first rule whose `payee` text occurs in a
//! transaction's payee wins.

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One mapping rule: case-insensitive substring -> friendly name + category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayeeRule {
    /// Substring to search for, stored case-folded
    #[serde(rename = "payee")]
    pub match_substring: String,
    #[serde(rename = "repl")]
    pub friendly_name: String,
    pub category: String,
}

impl PayeeRule {
    pub fn new(match_substring: &str, friendly_name: &str, category: &str) -> Self {
        Self {
            match_substring: match_substring.trim().to_lowercase(),
            friendly_name: friendly_name.trim().to_string(),
            category: category.trim().to_string(),
        }
    }
}

/// Ordered rule table; order is part of its meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayeeMapping {
    rules: Vec<PayeeRule>,
}

impl PayeeMapping {
    pub fn new(rules: Vec<PayeeRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PayeeRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<(&str, &str, &str)>> for PayeeMapping {
    fn from(rules: Vec<(&str, &str, &str)>) -> Self {
        Self::new(
            rules
                .into_iter()
                .map(|(m, name, cat)| PayeeRule::new(m, name, cat))
                .collect(),
        )
    }
}

/// Parse a mapping table from any reader.
pub fn read_payee_mapping<R: Read>(reader: R) -> Result<PayeeMapping> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rules = Vec::new();
    for (i, result) in rdr.deserialize::<PayeeRule>().enumerate() {
        let rule = result.with_context(|| format!("mapping row {}", i + 2))?;
        if rule.match_substring.is_empty() {
            // an empty needle would match every payee
            warn!("ignoring payee mapping row {} with empty match text", i + 2);
            continue;
        }
        rules.push(PayeeRule::new(&rule.match_substring, &rule.friendly_name, &rule.category));
    }

    Ok(PayeeMapping::new(rules))
}

/// Load a mapping CSV from disk.
pub fn load_payee_mapping(path: impl AsRef<Path>) -> Result<PayeeMapping> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_payee_mapping(file).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn mapping_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("testdata")
            .join("payee_mapping.csv")
    }

    #[test]
    fn test_reads_rules_in_order_and_case_folds() {
        let csv = "payee, repl, category\nAMZN, Amazon, Shopping\namazon prime, Amazon Prime, Subscriptions\n";
        let mapping = read_payee_mapping(csv.as_bytes()).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.rules()[0], PayeeRule::new("amzn", "Amazon", "Shopping"));
        assert_eq!(mapping.rules()[1].match_substring, "amazon prime");
    }

    #[test]
    fn test_skips_empty_match_text() {
        let csv = "payee,repl,category\n,Everything,Misc\ntesco,Tesco,Groceries\n";
        let mapping = read_payee_mapping(csv.as_bytes()).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.rules()[0].friendly_name, "Tesco");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "payee,repl\ntesco,Tesco\n";
        assert!(read_payee_mapping(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_load_fixture() {
        let mapping = load_payee_mapping(mapping_path()).expect("should parse payee_mapping.csv");
        assert!(!mapping.is_empty());
        assert!(mapping.rules().iter().all(|r| r.match_substring == r.match_substring.to_lowercase()));
    }
}
