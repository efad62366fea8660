//! Type registry error types

use thiserror::Error;

/// Result type for registry lookups
pub type TypeResult<T> = Result<T, UnknownTypeError>;

/// A coercion was requested for an unregistered semantic type name.
///
/// Fatal and surfaced immediately; the registry is the single failure
/// point of the coercion layer.
#[derive(Debug, Clone, Error)]
#[error("Unknown type: {name} is not a registered semantic type")]
pub struct UnknownTypeError {
    /// The unregistered name as requested
    pub name: String,
}

impl UnknownTypeError {
    /// Creates an error for the given type name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
