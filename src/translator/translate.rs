//! Statement translation
//!
//! Converts a `QueryModel` plus its column bindings into a store-native
//! operation, the diagnostic statement text and the params sub-map that
//! execution records into map-shape responses.
//!
//! Translation is a pure function of its inputs: no side effects, safe to
//! call repeatedly, identical input yields byte-identical statements.
//!
//! Per-kind rules:
//! 1. Insert strips the identity field from the payload; the store
//!    assigns identity. Multi-insert strips it from every row.
//! 2. A grouped select emits a grouping operation and ignores
//!    sort/limit/offset; grouping and pagination are mutually exclusive.
//! 3. A structured filter may nest its predicate under `$query` and a
//!    sort under `$orderby`; the sort is extracted and never stays inside
//!    the find predicate.
//! 4. A literal command payload bypasses translation entirely.

use std::collections::BTreeMap;

use serde_json::Value as Json;

use crate::query::{FieldMap, QueryKind, QueryModel};
use crate::types::{TypeRegistry, TypeResult};
use crate::value::{Document, NativeValue};

use super::errors::{TranslateResult, UnsupportedStatementError};
use super::operation::NativeOperation;
use super::statement;

/// The store-assigned identity field, stripped from insert payloads
pub const IDENTITY_FIELD: &str = "_id";

/// Reserved filter key nesting the actual predicate
pub const QUERY_KEY: &str = "$query";

/// Reserved filter key nesting a sort specification
pub const ORDERBY_KEY: &str = "$orderby";

/// Column bindings: field name to semantic type name.
///
/// Payload and filter values for bound fields coerce through the type
/// registry before emission; unbound fields take the default JSON
/// conversion.
pub type BoundParams = BTreeMap<String, String>;

/// The product of translating one query.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// The operation to dispatch
    pub operation: NativeOperation,
    /// The diagnostic statement reproduction
    pub statement: String,
    /// Bookkeeping recorded into map-shape responses under `params`
    pub params: FieldMap,
}

/// Translates query models into store-native operations.
pub struct StatementTranslator;

impl StatementTranslator {
    /// Resolves a statement name to its kind.
    ///
    /// This is the explicit finite mapping for names arriving from
    /// outside the process; anything not in the table is rejected.
    pub fn resolve_kind(name: &str) -> TranslateResult<QueryKind> {
        match name {
            "select" => Ok(QueryKind::Select),
            "insert" => Ok(QueryKind::Insert),
            "multiInsert" => Ok(QueryKind::MultiInsert),
            "update" => Ok(QueryKind::Update),
            "delete" => Ok(QueryKind::Delete),
            "truncate" => Ok(QueryKind::Truncate),
            "createTable" => Ok(QueryKind::CreateTable),
            "createIndex" => Ok(QueryKind::CreateIndex),
            "dropTable" => Ok(QueryKind::DropTable),
            "dropIndex" => Ok(QueryKind::DropIndex),
            other => Err(UnsupportedStatementError::new(other)),
        }
    }

    /// Translates a query into an operation, statement and params.
    ///
    /// The only runtime failure is an unregistered semantic type in the
    /// bindings; the kind dispatch itself is a closed match.
    pub fn translate(query: &QueryModel, bindings: &BoundParams) -> TypeResult<Translation> {
        // A literal command bypasses translation entirely.
        if let Some(body) = query.command() {
            let operation = NativeOperation::Command {
                body: NativeValue::from(body.clone()),
            };
            // Execution records the command body itself; no params needed.
            return Ok(Self::finish(operation, FieldMap::new()));
        }

        let ns = query.table().to_string();

        match query.kind() {
            QueryKind::Insert => {
                let document = coerce_payload(query.fields(), bindings, true)?;
                let mut params = FieldMap::new();
                params.insert("values".to_string(), doc_repr(&document));
                Ok(Self::finish(
                    NativeOperation::Insert {
                        collection: ns,
                        document,
                    },
                    params,
                ))
            }
            QueryKind::MultiInsert => {
                let documents = query
                    .rows()
                    .iter()
                    .map(|row| coerce_payload(row, bindings, true))
                    .collect::<TypeResult<Vec<_>>>()?;
                let mut params = FieldMap::new();
                params.insert(
                    "values".to_string(),
                    Json::Array(documents.iter().map(doc_repr).collect()),
                );
                Ok(Self::finish(
                    NativeOperation::InsertMany {
                        collection: ns,
                        documents,
                    },
                    params,
                ))
            }
            QueryKind::Select => Self::translate_select(query, bindings, ns),
            QueryKind::Update => {
                let filter = coerce_filter(extract_where(query.filter()), bindings)?;
                let changes = coerce_payload(query.fields(), bindings, false)?;
                let options = NativeValue::document_from(query.attributes());
                let mut params = FieldMap::new();
                params.insert("where".to_string(), filter.to_json_repr());
                params.insert("fields".to_string(), doc_repr(&changes));
                Ok(Self::finish(
                    NativeOperation::Update {
                        collection: ns,
                        filter,
                        changes,
                        options,
                    },
                    params,
                ))
            }
            QueryKind::Delete => {
                let filter = coerce_filter(extract_where(query.filter()), bindings)?;
                let just_one = query
                    .attributes()
                    .get("justOne")
                    .map(json_truthy)
                    .unwrap_or(false);
                let mut params = FieldMap::new();
                params.insert("where".to_string(), filter.to_json_repr());
                Ok(Self::finish(
                    NativeOperation::Remove {
                        collection: ns,
                        filter,
                        just_one,
                    },
                    params,
                ))
            }
            QueryKind::Truncate => Ok(Self::finish(
                NativeOperation::RemoveAll { collection: ns },
                FieldMap::new(),
            )),
            QueryKind::CreateTable => {
                let options = NativeValue::document_from(query.attributes());
                let mut params = FieldMap::new();
                params.insert("name".to_string(), Json::String(ns.clone()));
                Ok(Self::finish(
                    NativeOperation::CreateCollection { name: ns, options },
                    params,
                ))
            }
            QueryKind::CreateIndex => {
                let keys = NativeValue::document_from(query.fields());
                let options = NativeValue::document_from(query.attributes());
                let mut params = FieldMap::new();
                params.insert("fields".to_string(), doc_repr(&keys));
                Ok(Self::finish(
                    NativeOperation::CreateIndex {
                        collection: ns,
                        keys,
                        options,
                    },
                    params,
                ))
            }
            QueryKind::DropTable => Ok(Self::finish(
                NativeOperation::DropCollection { collection: ns },
                FieldMap::new(),
            )),
            QueryKind::DropIndex => {
                let keys = NativeValue::document_from(query.fields());
                let mut params = FieldMap::new();
                params.insert("fields".to_string(), doc_repr(&keys));
                Ok(Self::finish(
                    NativeOperation::DropIndex {
                        collection: ns,
                        keys,
                    },
                    params,
                ))
            }
        }
    }

    fn translate_select(
        query: &QueryModel,
        bindings: &BoundParams,
        ns: String,
    ) -> TypeResult<Translation> {
        // Grouping wins over pagination: sort, limit and offset are
        // ignored when group fields are present.
        if !query.group_by().is_empty() {
            let condition = coerce_filter(extract_where(query.filter()), bindings)?;
            let keys = query.group_by().to_vec();
            let mut params = FieldMap::new();
            params.insert(
                "groupBy".to_string(),
                Json::Array(keys.iter().cloned().map(Json::String).collect()),
            );
            params.insert("where".to_string(), condition.to_json_repr());
            return Ok(Self::finish(
                NativeOperation::Group {
                    collection: ns,
                    keys,
                    condition,
                },
                params,
            ));
        }

        let filter = coerce_filter(extract_where(query.filter()), bindings)?;
        let order = extract_orderby(query.filter())
            .or_else(|| query.sort().cloned())
            .map(|map| NativeValue::document_from(&map));
        let projection = NativeValue::document_from(query.fields());
        let limit = query.limit().filter(|n| *n > 0);
        let skip = query.offset().filter(|n| *n > 0);

        let mut params = FieldMap::new();
        params.insert(
            "query".to_string(),
            query.filter().cloned().unwrap_or(Json::Object(FieldMap::new())),
        );
        params.insert("fields".to_string(), doc_repr(&projection));

        Ok(Self::finish(
            NativeOperation::Find {
                collection: ns,
                filter,
                projection,
                sort: order,
                limit,
                skip,
                count_only: query.is_count_only(),
            },
            params,
        ))
    }

    fn finish(operation: NativeOperation, params: FieldMap) -> Translation {
        let statement = statement::render(&operation);
        Translation {
            operation,
            statement,
            params,
        }
    }
}

/// Extracts the predicate from a structured filter.
///
/// A filter nesting its predicate under `$query` yields that sub-document;
/// otherwise the filter itself is the predicate, minus any nested
/// `$orderby`, which must never stay inside the find predicate.
fn extract_where(filter: Option<&Json>) -> FieldMap {
    match filter {
        Some(Json::Object(map)) => {
            if let Some(Json::Object(nested)) = map.get(QUERY_KEY) {
                return nested.clone();
            }
            let mut rest = map.clone();
            rest.remove(ORDERBY_KEY);
            rest.remove(QUERY_KEY);
            rest
        }
        _ => FieldMap::new(),
    }
}

/// Extracts a sort specification nested under `$orderby`, if present
fn extract_orderby(filter: Option<&Json>) -> Option<FieldMap> {
    match filter {
        Some(Json::Object(map)) => match map.get(ORDERBY_KEY) {
            Some(Json::Object(order)) => Some(order.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Coerces a payload map to wire values, optionally stripping identity
fn coerce_payload(
    fields: &FieldMap,
    bindings: &BoundParams,
    strip_identity: bool,
) -> TypeResult<Document> {
    let mut doc = Document::new();
    for (name, value) in fields {
        if strip_identity && name == IDENTITY_FIELD {
            continue;
        }
        doc.insert(name.clone(), coerce_value(name, value, bindings)?);
    }
    Ok(doc)
}

/// Coerces a predicate document to wire values.
///
/// Coercion is shallow: top-level field keys only. Operator keys (the
/// `$` namespace) and nested operator documents pass through the default
/// conversion.
fn coerce_filter(predicate: FieldMap, bindings: &BoundParams) -> TypeResult<NativeValue> {
    let mut doc = Document::new();
    for (name, value) in &predicate {
        if name.starts_with('$') || value.is_object() {
            doc.insert(name.clone(), NativeValue::from(value.clone()));
        } else {
            doc.insert(name.clone(), coerce_value(name, value, bindings)?);
        }
    }
    Ok(NativeValue::Object(doc))
}

fn coerce_value(field: &str, value: &Json, bindings: &BoundParams) -> TypeResult<NativeValue> {
    match bindings.get(field) {
        Some(type_name) => {
            let descriptor = TypeRegistry::resolve(type_name)?;
            Ok(descriptor.to_native(NativeValue::from(value.clone())))
        }
        None => Ok(NativeValue::from(value.clone())),
    }
}

fn json_truthy(value: &Json) -> bool {
    match value {
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        _ => false,
    }
}

fn doc_repr(doc: &Document) -> Json {
    NativeValue::Object(doc.clone()).to_json_repr()
}
