//! Error types for the regdesk state store.

use thiserror::Error;

/// Result type alias for state store operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur during state store operations.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The caller supplied data that violates a record invariant.
    #[error("invalid input: {0}")]
    Invalid(String),
}

impl StateError {
    /// True for errors caused by the request rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StateError::NotFound(_) | StateError::Invalid(_))
    }
}
