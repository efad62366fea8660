//! Semantic type registry
//!
//! Maps semantic type names to coercion descriptors. The table is built
//! once on first access and is read-only afterward, so concurrent lookups
//! from multiple drivers are safe.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::descriptors::{
    ArrayType, BlobType, BooleanType, DatetimeType, DoubleType, FloatType, Int32Type, Int64Type,
    IntType, ObjectType, StringType, TypeDescriptor,
};
use super::errors::{TypeResult, UnknownTypeError};

static INT: IntType = IntType;
static INT32: Int32Type = Int32Type;
static INT64: Int64Type = Int64Type;
static STRING: StringType = StringType;
static ARRAY: ArrayType = ArrayType;
static OBJECT: ObjectType = ObjectType;
static BOOLEAN: BooleanType = BooleanType;
static FLOAT: FloatType = FloatType;
static DOUBLE: DoubleType = DoubleType;
static DATETIME: DatetimeType = DatetimeType;
static BLOB: BlobType = BlobType;

/// The process-wide registration table.
///
/// Aliases share one descriptor: all temporal names map to the datetime
/// strategy, blob and binary map to the binary strategy.
static REGISTRY: Lazy<HashMap<&'static str, &'static dyn TypeDescriptor>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, &'static dyn TypeDescriptor> = HashMap::new();
    table.insert("int", &INT);
    table.insert("integer", &INT);
    table.insert("number", &INT);
    table.insert("int32", &INT32);
    table.insert("int64", &INT64);
    table.insert("string", &STRING);
    table.insert("array", &ARRAY);
    table.insert("object", &OBJECT);
    table.insert("boolean", &BOOLEAN);
    table.insert("float", &FLOAT);
    table.insert("double", &DOUBLE);
    table.insert("date", &DATETIME);
    table.insert("time", &DATETIME);
    table.insert("datetime", &DATETIME);
    table.insert("timestamp", &DATETIME);
    table.insert("blob", &BLOB);
    table.insert("binary", &BLOB);
    table
});

/// Read-only access to the registered type descriptors.
pub struct TypeRegistry;

impl TypeRegistry {
    /// Resolves a semantic type name to its descriptor
    pub fn resolve(name: &str) -> TypeResult<&'static dyn TypeDescriptor> {
        REGISTRY
            .get(name)
            .copied()
            .ok_or_else(|| UnknownTypeError::new(name))
    }

    /// Returns true if the name is registered
    pub fn is_registered(name: &str) -> bool {
        REGISTRY.contains_key(name)
    }
}
