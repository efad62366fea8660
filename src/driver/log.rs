//! Audit sink seam
//!
//! Every executed query hands its finished result to the configured sink,
//! primarily for the diagnostic statement and timing. This layer has no
//! opinion on sink format.

use crate::result::ResultSet;

/// Receives every finished result after execution.
pub trait QueryLog {
    /// Records one executed query
    fn log_query(&mut self, result: &ResultSet);
}
