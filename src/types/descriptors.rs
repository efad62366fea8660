//! Built-in type descriptors
//!
//! Each descriptor is a stateless, bidirectional coercion strategy between
//! application values and store wire values:
//! - `to_native` prepares a value for the wire and is idempotent: input
//!   already in wire representation passes through unchanged.
//! - `from_native` surfaces a wire value to the application; the narrow
//!   integer types intentionally widen to decimal strings so no precision
//!   is silently lost crossing the wire boundary.
//!
//! Coercion is permissive and never fails; only registry lookup can.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::value::NativeValue;

/// A named, bidirectional value-conversion strategy.
pub trait TypeDescriptor: Send + Sync + std::fmt::Debug {
    /// Canonical type tag; integer descriptors report "int" plus bit width
    fn name(&self) -> &'static str;

    /// Application value to store wire representation. Idempotent.
    fn to_native(&self, value: NativeValue) -> NativeValue;

    /// Store wire representation to application value
    fn from_native(&self, value: NativeValue) -> NativeValue;
}

/// Plain integer; the store carries it as a 64-bit number
#[derive(Debug)]
pub struct IntType;

impl TypeDescriptor for IntType {
    fn name(&self) -> &'static str {
        "int"
    }

    fn to_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            NativeValue::Int64(_) => value,
            other => NativeValue::Int64(other.to_i64_lossy()),
        }
    }

    fn from_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            other => NativeValue::Int64(other.to_i64_lossy()),
        }
    }
}

/// 32-bit integer wire wrapper.
///
/// Surfaces as a decimal string on the application side.
#[derive(Debug)]
pub struct Int32Type;

impl TypeDescriptor for Int32Type {
    fn name(&self) -> &'static str {
        "int32"
    }

    fn to_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            NativeValue::Int32(_) => value,
            other => NativeValue::Int32(other.to_i64_lossy() as i32),
        }
    }

    fn from_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            other => NativeValue::String(other.to_i64_lossy().to_string()),
        }
    }
}

/// 64-bit integer wire wrapper.
///
/// Surfaces as a decimal string on the application side.
#[derive(Debug)]
pub struct Int64Type;

impl TypeDescriptor for Int64Type {
    fn name(&self) -> &'static str {
        "int64"
    }

    fn to_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            NativeValue::Int64(_) => value,
            other => NativeValue::Int64(other.to_i64_lossy()),
        }
    }

    fn from_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            other => NativeValue::String(other.to_i64_lossy().to_string()),
        }
    }
}

/// UTF-8 string
#[derive(Debug)]
pub struct StringType;

impl StringType {
    fn stringify(value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            NativeValue::String(_) => value,
            NativeValue::Bool(b) => NativeValue::String(b.to_string()),
            NativeValue::Int32(v) => NativeValue::String(v.to_string()),
            NativeValue::Int64(v) => NativeValue::String(v.to_string()),
            NativeValue::Double(v) => NativeValue::String(v.to_string()),
            other => NativeValue::String(other.to_json_repr().to_string()),
        }
    }
}

impl TypeDescriptor for StringType {
    fn name(&self) -> &'static str {
        "string"
    }

    fn to_native(&self, value: NativeValue) -> NativeValue {
        Self::stringify(value)
    }

    fn from_native(&self, value: NativeValue) -> NativeValue {
        Self::stringify(value)
    }
}

/// Ordered list; scalars wrap into a one-element list
#[derive(Debug)]
pub struct ArrayType;

impl TypeDescriptor for ArrayType {
    fn name(&self) -> &'static str {
        "array"
    }

    fn to_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            NativeValue::Array(_) => value,
            other => NativeValue::Array(vec![other]),
        }
    }

    fn from_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            NativeValue::Array(_) => value,
            other => NativeValue::Array(vec![other]),
        }
    }
}

/// Unordered key/value document
#[derive(Debug)]
pub struct ObjectType;

impl TypeDescriptor for ObjectType {
    fn name(&self) -> &'static str {
        "object"
    }

    fn to_native(&self, value: NativeValue) -> NativeValue {
        value
    }

    fn from_native(&self, value: NativeValue) -> NativeValue {
        value
    }
}

/// Boolean; numbers coerce by zero-test
#[derive(Debug)]
pub struct BooleanType;

impl BooleanType {
    fn boolify(value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            NativeValue::Bool(_) => value,
            NativeValue::Int32(v) => NativeValue::Bool(v != 0),
            NativeValue::Int64(v) => NativeValue::Bool(v != 0),
            NativeValue::Double(v) => NativeValue::Bool(v != 0.0),
            NativeValue::String(s) => NativeValue::Bool(!s.is_empty() && s != "0"),
            _ => NativeValue::Bool(false),
        }
    }
}

impl TypeDescriptor for BooleanType {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn to_native(&self, value: NativeValue) -> NativeValue {
        Self::boolify(value)
    }

    fn from_native(&self, value: NativeValue) -> NativeValue {
        Self::boolify(value)
    }
}

/// Single-precision float; the store carries all floats as doubles
#[derive(Debug)]
pub struct FloatType;

impl TypeDescriptor for FloatType {
    fn name(&self) -> &'static str {
        "float"
    }

    fn to_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            NativeValue::Double(_) => value,
            other => NativeValue::Double(other.to_f64_lossy()),
        }
    }

    fn from_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            other => NativeValue::Double(other.to_f64_lossy()),
        }
    }
}

/// Double-precision float
#[derive(Debug)]
pub struct DoubleType;

impl TypeDescriptor for DoubleType {
    fn name(&self) -> &'static str {
        "double"
    }

    fn to_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            NativeValue::Double(_) => value,
            other => NativeValue::Double(other.to_f64_lossy()),
        }
    }

    fn from_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            other => NativeValue::Double(other.to_f64_lossy()),
        }
    }
}

/// Temporal value; one wire representation shared by date, time, datetime
/// and timestamp. Accepts epoch seconds, RFC 3339 or "Y-m-d H:M:S" text.
#[derive(Debug)]
pub struct DatetimeType;

impl DatetimeType {
    fn parse(value: &NativeValue) -> Option<DateTime<Utc>> {
        match value {
            NativeValue::Int32(v) => Utc.timestamp_opt(*v as i64, 0).single(),
            NativeValue::Int64(v) => Utc.timestamp_opt(*v, 0).single(),
            NativeValue::Double(v) => Utc.timestamp_opt(*v as i64, 0).single(),
            NativeValue::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|d| d.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                        .ok()
                        .map(|n| Utc.from_utc_datetime(&n))
                }),
            _ => None,
        }
    }
}

impl TypeDescriptor for DatetimeType {
    fn name(&self) -> &'static str {
        "datetime"
    }

    fn to_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            NativeValue::DateTime(_) => value,
            other => Self::parse(&other)
                .map(NativeValue::DateTime)
                .unwrap_or(NativeValue::Null),
        }
    }

    fn from_native(&self, value: NativeValue) -> NativeValue {
        // Temporal values stay in wire form on the application side; the
        // application consumes the parsed timestamp directly.
        value
    }
}

/// Binary payload; text coerces to its UTF-8 bytes
#[derive(Debug)]
pub struct BlobType;

impl TypeDescriptor for BlobType {
    fn name(&self) -> &'static str {
        "blob"
    }

    fn to_native(&self, value: NativeValue) -> NativeValue {
        match value {
            NativeValue::Null => NativeValue::Null,
            NativeValue::Binary(_) => value,
            NativeValue::String(s) => NativeValue::Binary(s.into_bytes()),
            other => NativeValue::Binary(other.to_json_repr().to_string().into_bytes()),
        }
    }

    fn from_native(&self, value: NativeValue) -> NativeValue {
        // Binary values stay in wire form on the application side.
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_int32_to_native_is_idempotent() {
        let once = Int32Type.to_native(NativeValue::Int64(123456));
        assert_eq!(once, NativeValue::Int32(123456));
        let twice = Int32Type.to_native(once.clone());
        assert_eq!(twice, once);
    }

    #[test]
    fn test_narrow_integers_widen_to_strings() {
        let out = Int32Type.from_native(NativeValue::Int32(123456));
        assert_eq!(out, NativeValue::String("123456".into()));

        let out = Int64Type.from_native(NativeValue::Int64(123456));
        assert_eq!(out, NativeValue::String("123456".into()));
    }

    #[test]
    fn test_plain_int_stays_numeric() {
        let wire = IntType.to_native(NativeValue::Int64(123456));
        assert_eq!(IntType.from_native(wire), NativeValue::Int64(123456));
    }

    #[test]
    fn test_integer_names_carry_bit_width() {
        assert_eq!(IntType.name(), "int");
        assert_eq!(Int32Type.name(), "int32");
        assert_eq!(Int64Type.name(), "int64");
    }

    #[test]
    fn test_datetime_accepts_epoch_and_text() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let from_epoch = DatetimeType.to_native(NativeValue::Int64(expected.timestamp()));
        assert_eq!(from_epoch, NativeValue::DateTime(expected));

        let from_text =
            DatetimeType.to_native(NativeValue::String("2024-01-02T03:04:05Z".into()));
        assert_eq!(from_text, NativeValue::DateTime(expected));

        let from_plain =
            DatetimeType.to_native(NativeValue::String("2024-01-02 03:04:05".into()));
        assert_eq!(from_plain, NativeValue::DateTime(expected));
    }

    #[test]
    fn test_datetime_is_idempotent_and_round_trips() {
        let d = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        let wire = DatetimeType.to_native(NativeValue::DateTime(d));
        assert_eq!(wire, NativeValue::DateTime(d));
        assert_eq!(DatetimeType.from_native(wire), NativeValue::DateTime(d));
    }

    #[test]
    fn test_blob_takes_utf8_bytes() {
        let wire = BlobType.to_native(NativeValue::String("Binary data!".into()));
        assert_eq!(wire, NativeValue::Binary(b"Binary data!".to_vec()));
        assert_eq!(
            BlobType.from_native(wire.clone()),
            NativeValue::Binary(b"Binary data!".to_vec())
        );
    }

    #[test]
    fn test_nulls_pass_through_untouched() {
        assert_eq!(ArrayType.to_native(NativeValue::Null), NativeValue::Null);
        assert_eq!(DatetimeType.to_native(NativeValue::Null), NativeValue::Null);
        assert_eq!(Int32Type.from_native(NativeValue::Null), NativeValue::Null);
    }

    #[test]
    fn test_boolean_zero_test() {
        assert_eq!(
            BooleanType.to_native(NativeValue::Int64(0)),
            NativeValue::Bool(false)
        );
        assert_eq!(
            BooleanType.to_native(NativeValue::String("0".into())),
            NativeValue::Bool(false)
        );
        assert_eq!(
            BooleanType.to_native(NativeValue::Double(2.5)),
            NativeValue::Bool(true)
        );
    }
}
