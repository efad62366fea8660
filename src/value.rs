//! Store wire-value model
//!
//! `NativeValue` is the currency of the translation layer: a superset of
//! JSON that carries the store's dedicated scalar wrappers (32/64-bit
//! integers, temporal values, binary payloads) alongside the plain shapes
//! applications submit.
//!
//! Application code speaks `serde_json::Value`; the store speaks
//! `NativeValue`. The type-coercion registry converts between the two.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value as Json;

/// An ordered document of wire values.
///
/// Backed by a `BTreeMap`, so key order is lexicographic and rendering is
/// deterministic.
pub type Document = BTreeMap<String, NativeValue>;

/// A single store-native value.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    /// Absent or null value
    Null,
    /// Boolean
    Bool(bool),
    /// 32-bit integer wire wrapper
    Int32(i32),
    /// 64-bit integer; also the default shape for application integers
    Int64(i64),
    /// 64-bit floating point
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Ordered list
    Array(Vec<NativeValue>),
    /// Unordered key/value document
    Object(Document),
    /// Temporal value; shared by date, time, datetime and timestamp types
    DateTime(DateTime<Utc>),
    /// Binary payload
    Binary(Vec<u8>),
}

impl NativeValue {
    /// Returns the wire type name for diagnostics and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            NativeValue::Null => "null",
            NativeValue::Bool(_) => "bool",
            NativeValue::Int32(_) => "int32",
            NativeValue::Int64(_) => "int64",
            NativeValue::Double(_) => "double",
            NativeValue::String(_) => "string",
            NativeValue::Array(_) => "array",
            NativeValue::Object(_) => "object",
            NativeValue::DateTime(_) => "datetime",
            NativeValue::Binary(_) => "binary",
        }
    }

    /// Returns true if this value is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }

    /// Extracts an integer, coercing leniently.
    ///
    /// Numeric strings parse; anything non-numeric collapses to 0. The
    /// coercion layer is deliberately permissive, so this never fails.
    pub fn to_i64_lossy(&self) -> i64 {
        match self {
            NativeValue::Bool(b) => *b as i64,
            NativeValue::Int32(v) => *v as i64,
            NativeValue::Int64(v) => *v,
            NativeValue::Double(v) => *v as i64,
            NativeValue::String(s) => s.trim().parse().unwrap_or(0),
            NativeValue::DateTime(d) => d.timestamp(),
            _ => 0,
        }
    }

    /// Extracts a float, coercing leniently. Never fails.
    pub fn to_f64_lossy(&self) -> f64 {
        match self {
            NativeValue::Bool(b) => *b as i64 as f64,
            NativeValue::Int32(v) => *v as f64,
            NativeValue::Int64(v) => *v as f64,
            NativeValue::Double(v) => *v,
            NativeValue::String(s) => s.trim().parse().unwrap_or(0.0),
            NativeValue::DateTime(d) => d.timestamp() as f64,
            _ => 0.0,
        }
    }

    /// Renders this value as deterministic JSON for diagnostic statements.
    ///
    /// Integer wrappers render as plain numbers, temporal values as
    /// `{"$date": "<RFC 3339>"}`, binary payloads as
    /// `{"$binary": "<base64>"}`. Object keys stay lexicographically
    /// ordered, so the output is byte-stable for identical input.
    pub fn to_json_repr(&self) -> Json {
        match self {
            NativeValue::Null => Json::Null,
            NativeValue::Bool(b) => Json::Bool(*b),
            NativeValue::Int32(v) => Json::from(*v),
            NativeValue::Int64(v) => Json::from(*v),
            NativeValue::Double(v) => {
                serde_json::Number::from_f64(*v).map_or(Json::Null, Json::Number)
            }
            NativeValue::String(s) => Json::String(s.clone()),
            NativeValue::Array(items) => {
                Json::Array(items.iter().map(NativeValue::to_json_repr).collect())
            }
            NativeValue::Object(doc) => {
                let map = doc
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_repr()))
                    .collect();
                Json::Object(map)
            }
            NativeValue::DateTime(d) => {
                let mut map = serde_json::Map::new();
                map.insert(
                    "$date".to_string(),
                    Json::String(d.to_rfc3339_opts(SecondsFormat::Secs, true)),
                );
                Json::Object(map)
            }
            NativeValue::Binary(bytes) => {
                let mut map = serde_json::Map::new();
                map.insert("$binary".to_string(), Json::String(BASE64.encode(bytes)));
                Json::Object(map)
            }
        }
    }

    /// Converts an ordered JSON map into a wire document
    pub fn document_from(map: &serde_json::Map<String, Json>) -> Document {
        map.iter()
            .map(|(k, v)| (k.clone(), NativeValue::from(v.clone())))
            .collect()
    }
}

impl From<Json> for NativeValue {
    /// Default application-to-wire conversion.
    ///
    /// Integral JSON numbers become `Int64`, everything else fractional
    /// becomes `Double`. Dedicated wrappers (`Int32`, `DateTime`, `Binary`)
    /// are only produced by type descriptors, never by this blanket
    /// conversion.
    fn from(value: Json) -> Self {
        match value {
            Json::Null => NativeValue::Null,
            Json::Bool(b) => NativeValue::Bool(b),
            Json::Number(n) => {
                if let Some(v) = n.as_i64() {
                    NativeValue::Int64(v)
                } else {
                    NativeValue::Double(n.as_f64().unwrap_or(0.0))
                }
            }
            Json::String(s) => NativeValue::String(s),
            Json::Array(items) => {
                NativeValue::Array(items.into_iter().map(NativeValue::from).collect())
            }
            Json::Object(map) => NativeValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, NativeValue::from(v)))
                    .collect(),
            ),
        }
    }
}
