use thiserror::Error;

/// Rejected query parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown status filter '{0}'")]
    InvalidStatus(String),

    #[error("unknown sort key '{0}'")]
    InvalidSortKey(String),

    #[error("unknown sort order '{0}' (expected asc or desc)")]
    InvalidOrder(String),

    #[error("unknown date preset '{0}'")]
    InvalidPreset(String),

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}
