//! Driver error types

use thiserror::Error;

use crate::query::InvalidQueryError;
use crate::translator::UnsupportedStatementError;
use crate::types::UnknownTypeError;

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Umbrella error for the execution path.
///
/// Translation and validation failures are fatal and propagate as-is; no
/// retry happens at this layer. Connection-level failures carry whatever
/// the external connector reported.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The query description failed validation
    #[error(transparent)]
    InvalidQuery(#[from] InvalidQueryError),

    /// The statement kind has no translation rule
    #[error(transparent)]
    UnsupportedStatement(#[from] UnsupportedStatementError),

    /// A coercion named an unregistered semantic type
    #[error(transparent)]
    UnknownType(#[from] UnknownTypeError),

    /// The external connection reported a failure
    #[error("Connection error: {0}")]
    Connection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err: DriverError = UnknownTypeError::new("decimal128").into();
        assert!(err.to_string().contains("decimal128"));

        let err: DriverError = UnsupportedStatementError::new("upsert").into();
        assert!(err.to_string().contains("upsert"));
    }
}
