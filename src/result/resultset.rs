//! Response normalization
//!
//! Wraps either response shape behind one uniform result abstraction.
//! Every default is part of one explicit decision table rather than
//! implied by control flow:
//!
//! | field      | cursor shape            | map shape                      |
//! |------------|-------------------------|--------------------------------|
//! | executed   | always true             | `ok` present                   |
//! | success    | always true             | executed and `ok` truthy       |
//! | count      | live cursor count       | mutations: `n` (0 if absent); 1 otherwise |
//! | elapsed    | explain millis / 1000   | now - `startTime`              |
//! | find()     | drain cursor once       | `retval` > `results` > `values`, else empty |
//!
//! Missing keys are never errors; different command families legitimately
//! omit different keys.

use std::sync::Mutex;

use chrono::Utc;
use once_cell::sync::OnceCell;
use serde_json::Value as Json;

use crate::query::{FieldMap, QueryKind, QueryModel};
use crate::translator::{self, NativeOperation, UNKNOWN_STATEMENT};
use crate::value::NativeValue;

use super::cursor::DocumentCursor;
use super::response::RawResponse;

/// Keys checked, in order, for a command-response document payload
const PAYLOAD_KEYS: [&str; 3] = ["retval", "results", "values"];

/// Fractional seconds since the Unix epoch
pub(crate) fn epoch_seconds() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

/// Rounds to the fixed 5-decimal elapsed-time precision
fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

fn json_truthy(value: &Json) -> bool {
    match value {
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        _ => false,
    }
}

enum Source {
    Cursor(Mutex<Box<dyn DocumentCursor>>),
    Response(FieldMap),
}

/// The uniform result of one executed query.
///
/// Created once per execution and immutable afterward; the only interior
/// state is the single permitted cursor drain and the lazily rendered
/// statement.
pub struct ResultSet {
    source: Source,
    params: FieldMap,
    command: Option<Json>,
    operation: Option<NativeOperation>,
    kind: QueryKind,
    executed: bool,
    success: bool,
    count: u64,
    elapsed: f64,
    statement: OnceCell<String>,
}

impl ResultSet {
    /// Normalizes a raw response for the query that produced it
    pub fn normalize(raw: RawResponse, query: &QueryModel) -> Self {
        match raw {
            RawResponse::Cursor(cursor) => Self::from_cursor(cursor, query),
            RawResponse::Map(map) => Self::from_map(map, query),
        }
    }

    /// Normalizes a cursor-shape response.
    ///
    /// A cursor in hand means the read already ran, so the result is
    /// executed and successful by construction.
    pub fn from_cursor(cursor: Box<dyn DocumentCursor>, query: &QueryModel) -> Self {
        let params = cursor.info();
        let elapsed = cursor
            .explain()
            .map(|explain| round5(explain.millis as f64 / 1_000.0))
            .unwrap_or(0.0);

        Self {
            source: Source::Cursor(Mutex::new(cursor)),
            params,
            command: None,
            operation: None,
            kind: query.kind(),
            executed: true,
            success: true,
            count: 0,
            elapsed,
            statement: OnceCell::new(),
        }
    }

    /// Normalizes a map-shape response.
    ///
    /// Pops `params`, `command` and `startTime` out of the raw map before
    /// storing the remainder, so the response body never re-exposes
    /// translator bookkeeping.
    pub fn from_map(mut map: FieldMap, query: &QueryModel) -> Self {
        let mut params = match map.remove("params") {
            Some(Json::Object(inner)) => inner,
            _ => FieldMap::new(),
        };
        if !query.table().is_empty() {
            params.insert("ns".to_string(), Json::String(query.table().to_string()));
        }

        let command = map.remove("command");
        let start_time = map.remove("startTime").and_then(|v| v.as_f64());

        let executed = map.contains_key("ok");
        let success = executed && map.get("ok").map(json_truthy).unwrap_or(false);

        let count = if query.kind().is_mutation() {
            map.get("n").and_then(Json::as_u64).unwrap_or(0)
        } else {
            1
        };

        let elapsed = start_time
            .map(|start| round5((epoch_seconds() - start).max(0.0)))
            .unwrap_or(0.0);

        Self {
            source: Source::Response(map),
            params,
            command,
            operation: None,
            kind: query.kind(),
            executed,
            success,
            count,
            elapsed,
            statement: OnceCell::new(),
        }
    }

    /// Attaches the operation the statement renders from
    pub fn with_operation(mut self, operation: NativeOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Returns true if the store acknowledged execution
    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Returns true if the store reported success
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the affected or returned count.
    ///
    /// Mutation kinds report the store's affected-row count, other map
    /// responses are fixed at 1, cursor responses defer to a live count
    /// against the cursor.
    pub fn count(&self) -> u64 {
        match &self.source {
            Source::Cursor(cursor) => cursor
                .lock()
                .map(|guard| guard.matched_count())
                .unwrap_or(0),
            Source::Response(_) => self.count,
        }
    }

    /// Returns the elapsed wall-clock seconds, 5-decimal precision
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    /// Returns the params describing the operation actually sent
    pub fn params(&self) -> &FieldMap {
        &self.params
    }

    /// Returns the literal command payload, if execution bypassed
    /// translation
    pub fn command(&self) -> Option<&Json> {
        self.command.as_ref()
    }

    /// Returns the map-shape response body, if any
    pub fn response(&self) -> Option<&FieldMap> {
        match &self.source {
            Source::Response(map) => Some(map),
            Source::Cursor(_) => None,
        }
    }

    /// Materializes the result rows.
    ///
    /// Command payloads are checked under `retval`, then `results`, then
    /// `values`; the first present wins and a non-array payload surfaces
    /// as a one-element sequence. Without a recognized key the cursor is
    /// drained fully, once; a second call after exhaustion observes an
    /// empty sequence, which is correct, not an error.
    pub fn find(&self) -> Vec<Json> {
        match &self.source {
            Source::Response(map) => {
                for key in PAYLOAD_KEYS {
                    match map.get(key) {
                        Some(Json::Array(items)) => return items.clone(),
                        Some(other) => return vec![other.clone()],
                        None => {}
                    }
                }
                Vec::new()
            }
            Source::Cursor(cursor) => {
                let mut rows = Vec::new();
                if let Ok(mut guard) = cursor.lock() {
                    while let Some(document) = guard.next_document() {
                        rows.push(document);
                    }
                }
                rows
            }
        }
    }

    /// Acknowledges a mutation: the count on success, nothing on failure.
    ///
    /// Zero rows affected with a successful operation is distinct from a
    /// failed operation.
    pub fn save(&self) -> Option<u64> {
        if self.success {
            Some(self.count())
        } else {
            None
        }
    }

    /// No-op; the store's result objects need no teardown
    pub fn close(&self) -> bool {
        true
    }

    /// No-op; the operation already ran by the time this object exists
    pub fn execute(&self) -> bool {
        true
    }

    /// Returns the deterministic statement reproduction, rendering it on
    /// first access
    pub fn statement(&self) -> &str {
        self.statement.get_or_init(|| {
            if let Some(body) = &self.command {
                return translator::render(&NativeOperation::Command {
                    body: NativeValue::from(body.clone()),
                });
            }
            match &self.operation {
                Some(operation) => translator::render(operation),
                None => UNKNOWN_STATEMENT.to_string(),
            }
        })
    }

    /// Returns the statement kind this result answered
    pub fn kind(&self) -> QueryKind {
        self.kind
    }
}

impl std::fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSet")
            .field("kind", &self.kind.name())
            .field("executed", &self.executed)
            .field("success", &self.success)
            .field("count", &self.count)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}
