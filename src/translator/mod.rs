//! Query translation engine
//!
//! Turns an abstract `QueryModel` into a store-native operation plus a
//! deterministic, human-readable statement reproduction. Dispatch is an
//! explicit match over the closed statement-kind enum; names arriving
//! from outside the process resolve through `resolve_kind` and unknown
//! names are rejected with `UnsupportedStatementError`.

mod errors;
mod operation;
mod statement;
mod translate;

pub use errors::{TranslateResult, UnsupportedStatementError};
pub use operation::NativeOperation;
pub use statement::{render, statement_digest, UNKNOWN_STATEMENT};
pub use translate::{
    BoundParams, StatementTranslator, Translation, IDENTITY_FIELD, ORDERBY_KEY, QUERY_KEY,
};
