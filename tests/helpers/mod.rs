//! Shared test doubles: an in-memory store connection, a vector-backed
//! cursor, an external cache tier and a recording audit sink.

// Each integration binary uses a different subset of these doubles.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value as Json;
use uuid::Uuid;

use docdriver::driver::{CacheStorage, DriverResult, FindOptions, QueryLog, StoreConnection};
use docdriver::query::FieldMap;
use docdriver::result::{DocumentCursor, ExplainInfo, ResultSet};
use docdriver::value::{Document, NativeValue};

// =============================================================================
// Cursor
// =============================================================================

/// Cursor over a pre-materialized row set.
pub struct VecCursor {
    rows: std::vec::IntoIter<Json>,
    matched: u64,
    ns: String,
    explain_millis: Option<u64>,
}

impl VecCursor {
    pub fn new(rows: Vec<Json>, ns: impl Into<String>) -> Self {
        Self {
            matched: rows.len() as u64,
            rows: rows.into_iter(),
            ns: ns.into(),
            explain_millis: None,
        }
    }

    pub fn with_explain_millis(mut self, millis: u64) -> Self {
        self.explain_millis = Some(millis);
        self
    }
}

impl DocumentCursor for VecCursor {
    fn next_document(&mut self) -> Option<Json> {
        self.rows.next()
    }

    fn info(&self) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert("ns".to_string(), Json::String(self.ns.clone()));
        map
    }

    fn explain(&self) -> Option<ExplainInfo> {
        self.explain_millis.map(|millis| ExplainInfo { millis })
    }

    fn matched_count(&self) -> u64 {
        self.matched
    }
}

// =============================================================================
// Connection
// =============================================================================

/// In-memory store speaking the connection primitives.
#[derive(Default)]
pub struct MemoryConnection {
    collections: HashMap<String, Vec<FieldMap>>,
}

fn ack(n: u64) -> FieldMap {
    let mut map = FieldMap::new();
    map.insert("ok".to_string(), Json::from(1));
    map.insert("n".to_string(), Json::from(n));
    map
}

fn filter_object(filter: &NativeValue) -> FieldMap {
    match filter.to_json_repr() {
        Json::Object(map) => map,
        _ => FieldMap::new(),
    }
}

fn matches(doc: &FieldMap, filter: &FieldMap) -> bool {
    filter.iter().all(|(field, expected)| {
        if field.starts_with('$') {
            return true;
        }
        doc.get(field) == Some(expected)
    })
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_count(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }

    fn store_document(&mut self, collection: &str, document: &Document) -> String {
        let id = Uuid::new_v4().to_string();
        let mut doc = FieldMap::new();
        doc.insert("_id".to_string(), Json::String(id.clone()));
        for (field, value) in document {
            doc.insert(field.clone(), value.to_json_repr());
        }
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(doc);
        id
    }
}

impl StoreConnection for MemoryConnection {
    fn find(
        &mut self,
        collection: &str,
        filter: &NativeValue,
        _projection: &Document,
        options: &FindOptions,
    ) -> DriverResult<Box<dyn DocumentCursor>> {
        let predicate = filter_object(filter);
        let mut rows: Vec<FieldMap> = self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, &predicate))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = &options.sort {
            for (field, direction) in sort.iter().rev() {
                let descending = direction.to_i64_lossy() < 0;
                rows.sort_by(|a, b| {
                    let left = a.get(field).map(|v| v.to_string()).unwrap_or_default();
                    let right = b.get(field).map(|v| v.to_string()).unwrap_or_default();
                    if descending {
                        right.cmp(&left)
                    } else {
                        left.cmp(&right)
                    }
                });
            }
        }

        let skip = options.skip.unwrap_or(0) as usize;
        let mut rows: Vec<Json> = rows.into_iter().skip(skip).map(Json::Object).collect();
        if let Some(limit) = options.limit {
            rows.truncate(limit as usize);
        }

        Ok(Box::new(VecCursor::new(rows, collection)))
    }

    fn group(
        &mut self,
        collection: &str,
        keys: &[String],
        condition: &NativeValue,
    ) -> DriverResult<FieldMap> {
        let predicate = filter_object(condition);
        let mut seen = Vec::new();
        if let Some(docs) = self.collections.get(collection) {
            for doc in docs.iter().filter(|doc| matches(doc, &predicate)) {
                let mut group = FieldMap::new();
                for key in keys {
                    group.insert(key.clone(), doc.get(key).cloned().unwrap_or(Json::Null));
                }
                let group = Json::Object(group);
                if !seen.contains(&group) {
                    seen.push(group);
                }
            }
        }
        let mut map = ack(seen.len() as u64);
        map.insert("retval".to_string(), Json::Array(seen));
        Ok(map)
    }

    fn insert(&mut self, collection: &str, document: &Document) -> DriverResult<FieldMap> {
        let id = self.store_document(collection, document);
        let mut map = ack(1);
        map.insert("id".to_string(), Json::String(id));
        Ok(map)
    }

    fn insert_many(&mut self, collection: &str, documents: &[Document]) -> DriverResult<FieldMap> {
        let mut last_id = None;
        for document in documents {
            last_id = Some(self.store_document(collection, document));
        }
        let mut map = ack(documents.len() as u64);
        if let Some(id) = last_id {
            map.insert("id".to_string(), Json::String(id));
        }
        Ok(map)
    }

    fn update(
        &mut self,
        collection: &str,
        filter: &NativeValue,
        changes: &Document,
        _options: &Document,
    ) -> DriverResult<FieldMap> {
        let predicate = filter_object(filter);
        let mut affected = 0;
        if let Some(docs) = self.collections.get_mut(collection) {
            for doc in docs.iter_mut().filter(|doc| matches(doc, &predicate)) {
                for (field, value) in changes {
                    doc.insert(field.clone(), value.to_json_repr());
                }
                affected += 1;
            }
        }
        Ok(ack(affected))
    }

    fn remove(
        &mut self,
        collection: &str,
        filter: &NativeValue,
        just_one: bool,
    ) -> DriverResult<FieldMap> {
        let predicate = filter_object(filter);
        let mut removed = 0;
        if let Some(docs) = self.collections.get_mut(collection) {
            if just_one {
                if let Some(index) = docs.iter().position(|doc| matches(doc, &predicate)) {
                    docs.remove(index);
                    removed = 1;
                }
            } else {
                let before = docs.len();
                docs.retain(|doc| !matches(doc, &predicate));
                removed = (before - docs.len()) as u64;
            }
        }
        Ok(ack(removed))
    }

    fn remove_all(&mut self, collection: &str) -> DriverResult<FieldMap> {
        let removed = self
            .collections
            .get_mut(collection)
            .map(|docs| {
                let n = docs.len() as u64;
                docs.clear();
                n
            })
            .unwrap_or(0);
        Ok(ack(removed))
    }

    fn create_collection(&mut self, name: &str, _options: &Document) -> DriverResult<FieldMap> {
        self.collections.entry(name.to_string()).or_default();
        Ok(ack(0))
    }

    fn create_index(
        &mut self,
        _collection: &str,
        _keys: &Document,
        _options: &Document,
    ) -> DriverResult<FieldMap> {
        Ok(ack(0))
    }

    fn drop_collection(&mut self, collection: &str) -> DriverResult<FieldMap> {
        self.collections.remove(collection);
        Ok(ack(0))
    }

    fn drop_index(&mut self, _collection: &str, _keys: &Document) -> DriverResult<FieldMap> {
        Ok(ack(0))
    }

    fn run_command(&mut self, _body: &NativeValue) -> DriverResult<FieldMap> {
        Ok(ack(0))
    }

    fn list_collections(&mut self) -> DriverResult<Vec<String>> {
        let mut names: Vec<String> = self.collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Cache tier
// =============================================================================

/// External cache tier with hit/set counters.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Arc<ResultSet>>>,
    pub hits: Mutex<u32>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Shareable newtype wrapper so the external cache can be handed to the
/// driver as a `Box<dyn CacheStorage>` while the test keeps an `Arc` handle.
/// (A direct `impl CacheStorage for Arc<MemoryCache>` would violate the
/// orphan rule, since both the trait and `Arc` are foreign to this crate.)
pub struct SharedCache(pub Arc<MemoryCache>);

impl CacheStorage for SharedCache {
    fn has(&self, key: &str) -> bool {
        self.0.entries.lock().unwrap().contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Arc<ResultSet>> {
        let hit = self.0.entries.lock().unwrap().get(key).cloned();
        if hit.is_some() {
            *self.0.hits.lock().unwrap() += 1;
        }
        hit
    }

    fn set(&mut self, key: &str, value: Arc<ResultSet>, _ttl: Option<Duration>) {
        self.0
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value);
    }
}

// =============================================================================
// Audit sink
// =============================================================================

/// Sink capturing every logged statement.
pub struct RecordingLog {
    statements: Arc<Mutex<Vec<String>>>,
}

impl RecordingLog {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let statements = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                statements: Arc::clone(&statements),
            },
            statements,
        )
    }
}

impl QueryLog for RecordingLog {
    fn log_query(&mut self, result: &ResultSet) {
        self.statements
            .lock()
            .unwrap()
            .push(result.statement().to_string());
    }
}
