//! Translation error types

use thiserror::Error;

/// Result type for statement-kind resolution
pub type TranslateResult<T> = Result<T, UnsupportedStatementError>;

/// A statement name has no translation rule.
///
/// The statement vocabulary is a closed set; names arriving from outside
/// the process (serialized queries, cross-language callers) resolve
/// through an explicit finite mapping and anything outside it is rejected
/// here, naming the offending kind.
#[derive(Debug, Clone, Error)]
#[error("Query statement {kind} does not exist or has not been implemented")]
pub struct UnsupportedStatementError {
    /// The offending statement name as requested
    pub kind: String,
}

impl UnsupportedStatementError {
    /// Creates an error for the given statement name
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}
