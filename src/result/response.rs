//! Raw store responses
//!
//! The store answers in exactly one of two shapes: a live cursor for
//! reads, or a free-form key/value map for commands and writes. The
//! tagged union makes the split explicit; normalization pattern-matches
//! on the variant instead of probing for field presence.

use crate::query::FieldMap;

use super::cursor::DocumentCursor;

/// A raw response as received from the client library.
pub enum RawResponse {
    /// A live cursor from a read operation
    Cursor(Box<dyn DocumentCursor>),
    /// A free-form command response, possibly carrying any of `ok`, `n`,
    /// `id`, `retval`, `results`, `values`, `command`, `startTime` and a
    /// nested `params` sub-map
    Map(FieldMap),
}

impl RawResponse {
    /// Returns true for the cursor shape
    pub fn is_cursor(&self) -> bool {
        matches!(self, RawResponse::Cursor(_))
    }
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawResponse::Cursor(_) => f.write_str("RawResponse::Cursor(..)"),
            RawResponse::Map(map) => f.debug_tuple("RawResponse::Map").field(map).finish(),
        }
    }
}
