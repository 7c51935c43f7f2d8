use thiserror::Error;

/// Errors from box store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached (pool exhausted, I/O, TLS).
    #[error("connection error: {0}")]
    Connection(String),

    /// The backend rejected the write (check, unique or not-null constraint).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Any other failure while executing a statement.
    #[error("query error: {0}")]
    Query(String),

    /// A row came back but could not be turned into a `BoxRecord`.
    #[error("decode error: {0}")]
    Decode(String),
}
