//! Abstract query representation
//!
//! The immutable `QueryModel` describes one operation: statement kind,
//! target collection, payloads, filter, shaping directives and free-form
//! attributes. This layer never mutates a model after construction.

mod errors;
mod model;

pub use errors::{InvalidQueryError, QueryValidationResult};
pub use model::{FieldMap, QueryKind, QueryModel};
