//! Query model error types

use thiserror::Error;

/// Result type for query validation
pub type QueryValidationResult<T> = Result<T, InvalidQueryError>;

/// The value offered for execution is not a valid query description.
///
/// Fatal and surfaced immediately, no retry.
#[derive(Debug, Clone, Error)]
pub enum InvalidQueryError {
    /// Every statement kind except a literal command needs a collection
    #[error("Invalid query: {kind} statements require a target collection")]
    MissingTable {
        /// The statement kind missing its table
        kind: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_the_kind() {
        let err = InvalidQueryError::MissingTable { kind: "select" };
        assert!(err.to_string().contains("select"));
    }
}
