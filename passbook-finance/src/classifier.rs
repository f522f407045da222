//! Deterministic payee classification: first matching mapping rule wins.

use anyhow::Result;
use passbook_core::Transaction;
use std::path::Path;

use crate::payee_mapping::{PayeeMapping, load_payee_mapping};

/// Friendly payee name and category for one transaction. An empty category
/// means no rule matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub payee: String,
    pub category: String,
}

impl Classification {
    pub fn is_resolved(&self) -> bool {
        !self.category.is_empty()
    }
}

/// Classifier over a fixed mapping table. Read-only once built, so one
/// instance can be shared by every file-processing task.
#[derive(Debug, Clone, Default)]
pub struct PayeeClassifier {
    mapping: PayeeMapping,
}

impl PayeeClassifier {
    pub fn new(mapping: PayeeMapping) -> Self {
        Self { mapping }
    }

    /// Build from a mapping CSV at an explicit path
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(load_payee_mapping(path)?))
    }

    pub fn mapping(&self) -> &PayeeMapping {
        &self.mapping
    }

    /// Classify raw payee text. Unmatched payees come back unchanged with an
    /// empty category; this never fails.
    pub fn classify(&self, payee: &str) -> Classification {
        let folded = payee.to_lowercase();

        self.mapping
            .rules()
            .iter()
            .find(|rule| folded.contains(&rule.match_substring))
            .map(|rule| Classification {
                payee: rule.friendly_name.clone(),
                category: rule.category.clone(),
            })
            .unwrap_or_else(|| Classification {
                payee: payee.to_string(),
                category: String::new(),
            })
    }

    /// Replace a transaction's payee/category with its classification
    pub fn apply(&self, txn: Transaction) -> Transaction {
        let Classification { payee, category } = self.classify(&txn.payee);
        Transaction { payee, category, ..txn }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn classifier() -> PayeeClassifier {
        PayeeClassifier::new(PayeeMapping::from(vec![
            ("amzn", "Amazon", "Shopping"),
            ("amazon prime", "Amazon Prime", "Subscriptions"),
            ("tesco", "Tesco", "Groceries"),
        ]))
    }

    #[test]
    fn test_first_match_wins_over_more_specific_rule() {
        // Ordering hazard: "amazon prime" would be the better match, but the
        // earlier rule wins when both occur in the payee.
        let c = classifier().classify("AMZN MKTP AMAZON PRIME UK");
        assert_eq!(c, Classification { payee: "Amazon".into(), category: "Shopping".into() });
    }

    #[test]
    fn test_reordering_rules_changes_result() {
        let reordered = PayeeClassifier::new(PayeeMapping::from(vec![
            ("amazon prime", "Amazon Prime", "Subscriptions"),
            ("amzn", "Amazon", "Shopping"),
        ]));
        let c = reordered.classify("AMZN MKTP AMAZON PRIME UK");
        assert_eq!(c.category, "Subscriptions");
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let c = classifier().classify("Tesco Stores 2041");
        assert_eq!(c.payee, "Tesco");
        assert_eq!(c.category, "Groceries");
        assert!(c.is_resolved());
    }

    #[test]
    fn test_unmatched_payee_passes_through() {
        let c = classifier().classify("EXPRESS SALARY");
        assert_eq!(c.payee, "EXPRESS SALARY");
        assert_eq!(c.category, "");
        assert!(!c.is_resolved());
    }

    #[test]
    fn test_empty_mapping_never_resolves() {
        let c = PayeeClassifier::default().classify("TESCO");
        assert!(!c.is_resolved());
    }

    #[test]
    fn test_apply_keeps_amounts() {
        let txn = Transaction::new(
            NaiveDate::from_ymd_opt(2021, 1, 25).unwrap(),
            "TESCO STORES",
            Decimal::new(1250, 2),
            Decimal::ZERO,
            Decimal::new(98750, 2),
        );
        let out = classifier().apply(txn.clone());
        assert_eq!(out.payee, "Tesco");
        assert_eq!(out.category, "Groceries");
        assert_eq!(out.outflow, txn.outflow);
        assert_eq!(out.balance, txn.balance);
        assert_eq!(out.date, txn.date);
    }
}
