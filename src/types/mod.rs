//! Bidirectional type-coercion registry
//!
//! Converts between application-level scalar values and store-native wire
//! representations. Each semantic type name resolves to a stateless
//! descriptor with two directions:
//! - `to_native`: application value to wire value, idempotent
//! - `from_native`: wire value to application value; 32/64-bit integers
//!   widen to strings to avoid silent precision loss
//!
//! The registration table is static, built once at first use, and
//! read-only afterward.

mod descriptors;
mod errors;
mod registry;

pub use descriptors::{
    ArrayType, BlobType, BooleanType, DatetimeType, DoubleType, FloatType, Int32Type, Int64Type,
    IntType, ObjectType, StringType, TypeDescriptor,
};
pub use errors::{TypeResult, UnknownTypeError};
pub use registry::TypeRegistry;
