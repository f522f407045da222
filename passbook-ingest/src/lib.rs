//! passbook-ingest: tabula CSV reading, row parsing, continuation merging and
//! statement file discovery.

pub mod discovery;
pub mod merge;
pub mod parsers;
pub mod reader;
pub mod types;

pub use discovery::{discover_statements, statement_date_from_filename};
pub use merge::merge_continuations;
pub use parsers::{parse_amount, parse_row, parse_rows, parse_statement_date};
pub use reader::{read_raw_csv, read_raw_rows};
pub use types::{ParsedRow, RawRow};
