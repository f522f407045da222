use thiserror::Error;

/// Row-level failures that make a statement file unusable.
///
/// These are file-scoped: the orchestrator records them against the file and
/// moves on to the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error("malformed amount in {field} on line {line}: {value:?}")]
    MalformedAmount {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("malformed date on line {line}: {value:?}")]
    MalformedDate { line: usize, value: String },
}

pub type Result<T> = std::result::Result<T, StatementError>;
