//! Cursor seam
//!
//! Read operations hand back a live cursor owned by the client library.
//! The trait captures exactly what normalization needs: single-pass
//! document iteration, cursor metadata, an optional execution-plan
//! explain and a live matched count.

use serde_json::Value as Json;

use crate::query::FieldMap;

/// Execution-plan data reported by the store for a read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplainInfo {
    /// Server-side execution time in milliseconds
    pub millis: u64,
}

/// A live, stateful, single-pass handle over a read result.
///
/// Advancing the cursor is a mutating, non-idempotent operation; once
/// exhausted it stays exhausted. `matched_count` is a live call against
/// the store and is independent of iteration state.
pub trait DocumentCursor: Send {
    /// Advances the cursor and returns the next document, if any
    fn next_document(&mut self) -> Option<Json>;

    /// Returns cursor metadata (query plan info)
    fn info(&self) -> FieldMap;

    /// Returns execution-plan explain data when the store provides it
    fn explain(&self) -> Option<ExplainInfo> {
        None
    }

    /// Returns the number of documents the query matched
    fn matched_count(&self) -> u64;
}
