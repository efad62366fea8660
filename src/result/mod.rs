//! Response normalization and the uniform result model
//!
//! The store answers reads with a live cursor and everything else with a
//! free-form map. `RawResponse` models the split as a tagged union;
//! `ResultSet` normalizes both shapes behind one abstraction that callers
//! query without caring which path produced it.

mod cursor;
mod response;
mod resultset;

pub use cursor::{DocumentCursor, ExplainInfo};
pub use response::RawResponse;
pub use resultset::ResultSet;

pub(crate) use resultset::epoch_seconds;
