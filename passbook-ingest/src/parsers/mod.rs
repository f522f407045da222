pub mod row;

pub use row::{parse_amount, parse_row, parse_rows, parse_statement_date};
