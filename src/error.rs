use thiserror::Error;

/// Recoverable errors from validating user input or touching the ledger.
/// The session reports these and carries on with the ledger unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum LedgerError {
    #[error("invalid date '{0}': expected YYYY-MM-DD (e.g. 2024-03-20)")]
    InvalidDate(String),

    #[error("invalid amount '{0}': expected a number (e.g. 42.50)")]
    InvalidAmount(String),

    #[error("amount '{0}' is too large: at most 1,000,000,000,000,000 either way")]
    AmountOutOfRange(String),

    #[error("invalid type '{0}': expected 'credit' or 'debit'")]
    InvalidType(String),

    #[error("index {index} is out of range (ledger has {len} transactions)")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("invalid index '{0}': expected a whole number")]
    InvalidIndex(String),
}
