//! passbook-core: ledger types, error taxonomy and money helpers shared by the
//! statement pipeline crates

pub mod error;
pub mod ledger;
pub mod money;

pub use error::StatementError;
pub use ledger::{BalanceRecord, StatementFile, Transaction, is_zero_marker};
pub use money::{format_money, parse_amount_text};
