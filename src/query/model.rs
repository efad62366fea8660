//! Abstract query description
//!
//! A `QueryModel` is an immutable description of one store operation:
//! statement kind, target collection, payloads, filter predicate, shaping
//! directives and free-form statement attributes. It is constructed once
//! per operation through the builder methods and never mutated afterward;
//! the translation layer consumes it read-only.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::errors::{InvalidQueryError, QueryValidationResult};

/// An ordered JSON field map; key order is lexicographic and stable.
pub type FieldMap = serde_json::Map<String, Json>;

/// The closed set of statement kinds this layer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryKind {
    /// Read documents
    Select,
    /// Insert one document
    Insert,
    /// Insert a batch of documents
    MultiInsert,
    /// Mutate matching documents
    Update,
    /// Remove matching documents
    Delete,
    /// Remove every document in a collection
    Truncate,
    /// Create a collection
    CreateTable,
    /// Create an index
    CreateIndex,
    /// Drop a collection
    DropTable,
    /// Drop an index
    DropIndex,
}

impl QueryKind {
    /// Returns the statement name for diagnostics and logging
    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::Select => "select",
            QueryKind::Insert => "insert",
            QueryKind::MultiInsert => "multiInsert",
            QueryKind::Update => "update",
            QueryKind::Delete => "delete",
            QueryKind::Truncate => "truncate",
            QueryKind::CreateTable => "createTable",
            QueryKind::CreateIndex => "createIndex",
            QueryKind::DropTable => "dropTable",
            QueryKind::DropIndex => "dropIndex",
        }
    }

    /// Returns true for kinds whose result count is the store-reported
    /// affected-row count
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            QueryKind::Insert | QueryKind::MultiInsert | QueryKind::Update | QueryKind::Delete
        )
    }
}

/// Immutable description of one operation against the store.
///
/// The reserved filter keys `$query` and `$orderby` let a structured
/// filter carry its own sort specification; the translator extracts them
/// separately. The store reserves the `$` namespace for operators, so no
/// literal field name can collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryModel {
    kind: QueryKind,
    table: String,
    #[serde(default, skip_serializing_if = "FieldMap::is_empty")]
    fields: FieldMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    rows: Vec<FieldMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort: Option<FieldMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    group_by: Vec<String>,
    #[serde(default)]
    count_only: bool,
    #[serde(default, skip_serializing_if = "FieldMap::is_empty")]
    attributes: FieldMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    command: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cache_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cache_length: Option<Duration>,
}

impl QueryModel {
    /// Creates a query for the given kind and target collection
    pub fn new(kind: QueryKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            fields: FieldMap::new(),
            rows: Vec::new(),
            filter: None,
            sort: None,
            limit: None,
            offset: None,
            group_by: Vec::new(),
            count_only: false,
            attributes: FieldMap::new(),
            command: None,
            cache_key: None,
            cache_length: None,
        }
    }

    /// Creates a query carrying a literal pre-built command payload.
    ///
    /// Translation is bypassed for such queries; the command is emitted
    /// as-is.
    pub fn raw_command(body: Json) -> Self {
        let mut query = Self::new(QueryKind::Select, "");
        query.command = Some(body);
        query
    }

    /// Sets the field/value payload (projection, insert payload, update
    /// mutations or index spec depending on kind)
    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }

    /// Adds a single field to the payload
    pub fn with_field(mut self, name: impl Into<String>, value: Json) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Sets the batch payload for a multi-insert
    pub fn with_rows(mut self, rows: Vec<FieldMap>) -> Self {
        self.rows = rows;
        self
    }

    /// Sets the filter predicate
    pub fn with_filter(mut self, filter: Json) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the sort specification (field name to direction)
    pub fn with_sort(mut self, sort: FieldMap) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the result limit
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the result offset
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the grouping fields; grouping wins over sort/limit/offset
    pub fn with_group_by(mut self, fields: Vec<String>) -> Self {
        self.group_by = fields;
        self
    }

    /// Marks the query as count-only
    pub fn counting(mut self) -> Self {
        self.count_only = true;
        self
    }

    /// Adds a statement attribute (write-concern flags, justOne, index
    /// options, collection-creation options)
    pub fn with_attribute(mut self, name: impl Into<String>, value: Json) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Replaces the full attribute map
    pub fn with_attributes(mut self, attributes: FieldMap) -> Self {
        self.attributes = attributes;
        self
    }

    /// Sets the memoization directives
    pub fn with_cache(mut self, key: impl Into<String>, length: Duration) -> Self {
        self.cache_key = Some(key.into());
        self.cache_length = Some(length);
        self
    }

    /// Returns the statement kind
    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Returns the target collection name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the field/value payload
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Returns the multi-insert payload list
    pub fn rows(&self) -> &[FieldMap] {
        &self.rows
    }

    /// Returns the filter predicate
    pub fn filter(&self) -> Option<&Json> {
        self.filter.as_ref()
    }

    /// Returns the sort specification
    pub fn sort(&self) -> Option<&FieldMap> {
        self.sort.as_ref()
    }

    /// Returns the result limit
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Returns the result offset
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Returns the grouping fields
    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    /// Returns true if the query asks for a count instead of documents
    pub fn is_count_only(&self) -> bool {
        self.count_only
    }

    /// Returns the statement attributes
    pub fn attributes(&self) -> &FieldMap {
        &self.attributes
    }

    /// Returns the literal command payload if one was attached
    pub fn command(&self) -> Option<&Json> {
        self.command.as_ref()
    }

    /// Returns the memoization key
    pub fn cache_key(&self) -> Option<&str> {
        self.cache_key.as_deref()
    }

    /// Returns the memoization lifetime
    pub fn cache_length(&self) -> Option<Duration> {
        self.cache_length
    }

    /// Checks the construction invariant: every kind except a literal
    /// command needs a target collection.
    pub fn validate(&self) -> QueryValidationResult<()> {
        if self.table.is_empty() && self.command.is_none() {
            return Err(InvalidQueryError::MissingTable {
                kind: self.kind.name(),
            });
        }
        Ok(())
    }
}
