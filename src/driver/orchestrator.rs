//! Driver orchestration
//!
//! Owns the connection handle and runs the full execution path:
//! 1. Validate the query description
//! 2. Resolve the cache tiers by cache key
//! 3. Translate into a store-native operation
//! 4. Dispatch to the matching connection primitive
//! 5. Normalize the raw response into a ResultSet
//! 6. Record the last assigned identity, feed the audit sink, populate
//!    the cache
//!
//! One in-flight operation at a time; concurrent callers need their own
//! driver instance or external synchronization.

use std::sync::Arc;

use serde_json::Value as Json;
use tracing::debug;

use crate::query::{FieldMap, QueryModel};
use crate::result::{epoch_seconds, RawResponse, ResultSet};
use crate::translator::{
    statement_digest, BoundParams, NativeOperation, StatementTranslator, Translation,
};

use super::cache::{CacheStorage, QueryCache};
use super::connection::{FindOptions, StoreConnection};
use super::errors::DriverResult;
use super::log::QueryLog;

/// The driver: translates, executes, normalizes and caches queries
/// against one store connection.
pub struct DocumentDriver<C: StoreConnection> {
    connection: C,
    storage: Option<Box<dyn CacheStorage>>,
    local_cache: QueryCache,
    logger: Option<Box<dyn QueryLog>>,
    last_insert_id: Option<String>,
}

impl<C: StoreConnection> DocumentDriver<C> {
    /// Creates a driver over an established connection
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            storage: None,
            local_cache: QueryCache::new(),
            logger: None,
            last_insert_id: None,
        }
    }

    /// Attaches the external shared cache tier
    pub fn with_storage(mut self, storage: Box<dyn CacheStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Attaches the audit sink
    pub fn with_logger(mut self, logger: Box<dyn QueryLog>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Executes a query with no column bindings
    pub fn query(&mut self, query: &QueryModel) -> DriverResult<Arc<ResultSet>> {
        self.query_with_bindings(query, &BoundParams::new())
    }

    /// Executes a query, coercing bound fields through the type registry.
    ///
    /// Cache resolution happens before translation: the external tier is
    /// asked first, the local duplicate-query tier only when the external
    /// tier is absent or misses.
    pub fn query_with_bindings(
        &mut self,
        query: &QueryModel,
        bindings: &BoundParams,
    ) -> DriverResult<Arc<ResultSet>> {
        query.validate()?;

        if let Some(key) = query.cache_key() {
            if let Some(storage) = &self.storage {
                if storage.has(key) {
                    if let Some(hit) = storage.get(key) {
                        debug!(cache_key = key, tier = "storage", "query cache hit");
                        return Ok(hit);
                    }
                }
            }
            if let Some(hit) = self.local_cache.get(key) {
                debug!(cache_key = key, tier = "local", "query cache hit");
                return Ok(hit);
            }
        }

        let translation = StatementTranslator::translate(query, bindings)?;
        let digest = statement_digest(&translation.statement);
        debug!(
            statement = %translation.statement,
            digest = %digest,
            kind = query.kind().name(),
            "dispatching statement"
        );

        let start_time = epoch_seconds();
        let raw = self.dispatch(&translation, start_time)?;

        self.last_insert_id = match &raw {
            RawResponse::Map(map) => map.get("id").map(identity_string),
            RawResponse::Cursor(_) => None,
        };

        let result = Arc::new(
            ResultSet::normalize(raw, query).with_operation(translation.operation),
        );

        debug!(
            digest = %digest,
            success = result.is_success(),
            count = result.count(),
            elapsed = result.elapsed_seconds(),
            "statement finished"
        );
        if let Some(logger) = self.logger.as_mut() {
            logger.log_query(&result);
        }

        if let Some(key) = query.cache_key() {
            if let Some(storage) = self.storage.as_mut() {
                storage.set(key, Arc::clone(&result), query.cache_length());
            } else {
                self.local_cache.set(key, Arc::clone(&result));
            }
        }

        Ok(result)
    }

    /// Dispatches a translated operation to its connection primitive.
    ///
    /// Map responses get the dispatch timestamp and the translation
    /// bookkeeping attached, so normalization can pop them back out.
    fn dispatch(&mut self, translation: &Translation, start_time: f64) -> DriverResult<RawResponse> {
        let response = match &translation.operation {
            NativeOperation::Find {
                collection,
                filter,
                projection,
                sort,
                limit,
                skip,
                count_only: _,
            } => {
                let options = FindOptions {
                    sort: sort.clone(),
                    limit: *limit,
                    skip: *skip,
                };
                let cursor = self.connection.find(collection, filter, projection, &options)?;
                return Ok(RawResponse::Cursor(cursor));
            }
            NativeOperation::Group {
                collection,
                keys,
                condition,
            } => self.connection.group(collection, keys, condition)?,
            NativeOperation::Insert {
                collection,
                document,
            } => self.connection.insert(collection, document)?,
            NativeOperation::InsertMany {
                collection,
                documents,
            } => self.connection.insert_many(collection, documents)?,
            NativeOperation::Update {
                collection,
                filter,
                changes,
                options,
            } => self.connection.update(collection, filter, changes, options)?,
            NativeOperation::Remove {
                collection,
                filter,
                just_one,
            } => self.connection.remove(collection, filter, *just_one)?,
            NativeOperation::RemoveAll { collection } => self.connection.remove_all(collection)?,
            NativeOperation::CreateCollection { name, options } => {
                self.connection.create_collection(name, options)?
            }
            NativeOperation::CreateIndex {
                collection,
                keys,
                options,
            } => self.connection.create_index(collection, keys, options)?,
            NativeOperation::DropCollection { collection } => {
                self.connection.drop_collection(collection)?
            }
            NativeOperation::DropIndex { collection, keys } => {
                self.connection.drop_index(collection, keys)?
            }
            NativeOperation::Command { body } => {
                let mut map = self.connection.run_command(body)?;
                map.insert("command".to_string(), body.to_json_repr());
                map
            }
        };

        Ok(RawResponse::Map(stamp(response, translation, start_time)))
    }

    /// Returns the most recently assigned identity value
    pub fn last_insert_id(&self) -> Option<&str> {
        self.last_insert_id.as_deref()
    }

    /// Lists collection names in the selected database
    pub fn list_tables(&mut self) -> DriverResult<Vec<String>> {
        self.connection.list_collections()
    }

    /// Always empty; the store is schemaless
    pub fn describe_table(&mut self, _table: &str) -> FieldMap {
        FieldMap::new()
    }

    /// No-op; the store has no cross-statement atomicity
    pub fn begin_transaction(&mut self) -> bool {
        true
    }

    /// No-op; see `begin_transaction`
    pub fn commit_transaction(&mut self) -> bool {
        true
    }

    /// No-op; see `begin_transaction`
    pub fn rollback_transaction(&mut self) -> bool {
        true
    }

    /// Drops every locally cached result
    pub fn clear_local_cache(&mut self) {
        self.local_cache.clear();
    }
}

/// Attaches dispatch bookkeeping to a map response
fn stamp(mut map: FieldMap, translation: &Translation, start_time: f64) -> FieldMap {
    map.insert("startTime".to_string(), Json::from(start_time));
    if !translation.params.is_empty() {
        map.insert(
            "params".to_string(),
            Json::Object(translation.params.clone()),
        );
    }
    map
}

/// Renders a store identity value as a string
fn identity_string(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryKind;
    use crate::result::DocumentCursor;
    use crate::value::{Document, NativeValue};
    use serde_json::json;

    /// Connection that answers every write with a fixed acknowledgment
    /// and every read with an empty cursor.
    struct StubConnection {
        calls: Vec<&'static str>,
    }

    struct EmptyCursor;

    impl DocumentCursor for EmptyCursor {
        fn next_document(&mut self) -> Option<Json> {
            None
        }

        fn info(&self) -> FieldMap {
            FieldMap::new()
        }

        fn matched_count(&self) -> u64 {
            0
        }
    }

    fn ack(n: u64) -> FieldMap {
        match json!({"ok": 1, "n": n}) {
            Json::Object(map) => map,
            _ => unreachable!(),
        }
    }

    impl StoreConnection for StubConnection {
        fn find(
            &mut self,
            _collection: &str,
            _filter: &NativeValue,
            _projection: &Document,
            _options: &FindOptions,
        ) -> DriverResult<Box<dyn DocumentCursor>> {
            self.calls.push("find");
            Ok(Box::new(EmptyCursor))
        }

        fn group(
            &mut self,
            _collection: &str,
            _keys: &[String],
            _condition: &NativeValue,
        ) -> DriverResult<FieldMap> {
            self.calls.push("group");
            Ok(ack(1))
        }

        fn insert(&mut self, _collection: &str, _document: &Document) -> DriverResult<FieldMap> {
            self.calls.push("insert");
            let mut map = ack(1);
            map.insert("id".to_string(), json!("oid-1"));
            Ok(map)
        }

        fn insert_many(
            &mut self,
            _collection: &str,
            documents: &[Document],
        ) -> DriverResult<FieldMap> {
            self.calls.push("insert_many");
            Ok(ack(documents.len() as u64))
        }

        fn update(
            &mut self,
            _collection: &str,
            _filter: &NativeValue,
            _changes: &Document,
            _options: &Document,
        ) -> DriverResult<FieldMap> {
            self.calls.push("update");
            Ok(ack(2))
        }

        fn remove(
            &mut self,
            _collection: &str,
            _filter: &NativeValue,
            _just_one: bool,
        ) -> DriverResult<FieldMap> {
            self.calls.push("remove");
            Ok(ack(1))
        }

        fn remove_all(&mut self, _collection: &str) -> DriverResult<FieldMap> {
            self.calls.push("remove_all");
            Ok(ack(5))
        }

        fn create_collection(
            &mut self,
            _name: &str,
            _options: &Document,
        ) -> DriverResult<FieldMap> {
            self.calls.push("create_collection");
            Ok(ack(0))
        }

        fn create_index(
            &mut self,
            _collection: &str,
            _keys: &Document,
            _options: &Document,
        ) -> DriverResult<FieldMap> {
            self.calls.push("create_index");
            Ok(ack(0))
        }

        fn drop_collection(&mut self, _collection: &str) -> DriverResult<FieldMap> {
            self.calls.push("drop_collection");
            Ok(ack(0))
        }

        fn drop_index(&mut self, _collection: &str, _keys: &Document) -> DriverResult<FieldMap> {
            self.calls.push("drop_index");
            Ok(ack(0))
        }

        fn run_command(&mut self, _body: &NativeValue) -> DriverResult<FieldMap> {
            self.calls.push("run_command");
            Ok(ack(0))
        }

        fn list_collections(&mut self) -> DriverResult<Vec<String>> {
            self.calls.push("list_collections");
            Ok(vec!["users".to_string()])
        }
    }

    fn driver() -> DocumentDriver<StubConnection> {
        DocumentDriver::new(StubConnection { calls: Vec::new() })
    }

    #[test]
    fn test_invalid_query_is_rejected_before_dispatch() {
        let mut driver = driver();
        let err = driver
            .query(&QueryModel::new(QueryKind::Delete, ""))
            .unwrap_err();
        assert!(err.to_string().contains("delete"));
        assert!(driver.connection.calls.is_empty());
    }

    #[test]
    fn test_each_kind_hits_its_primitive() {
        let mut driver = driver();
        driver
            .query(&QueryModel::new(QueryKind::Truncate, "users"))
            .unwrap();
        driver
            .query(&QueryModel::new(QueryKind::DropTable, "users"))
            .unwrap();
        driver
            .query(&QueryModel::new(QueryKind::Select, "users"))
            .unwrap();
        assert_eq!(
            driver.connection.calls,
            vec!["remove_all", "drop_collection", "find"]
        );
    }

    #[test]
    fn test_insert_tracks_identity() {
        let mut driver = driver();
        assert_eq!(driver.last_insert_id(), None);
        driver
            .query(&QueryModel::new(QueryKind::Insert, "users").with_field("name", json!("a")))
            .unwrap();
        assert_eq!(driver.last_insert_id(), Some("oid-1"));

        // A following non-insert resets the tracked identity.
        driver
            .query(&QueryModel::new(QueryKind::Select, "users"))
            .unwrap();
        assert_eq!(driver.last_insert_id(), None);
    }

    #[test]
    fn test_transactions_are_noop_success() {
        let mut driver = driver();
        assert!(driver.begin_transaction());
        assert!(driver.commit_transaction());
        assert!(driver.rollback_transaction());
        assert!(driver.connection.calls.is_empty());
    }

    #[test]
    fn test_describe_table_is_empty() {
        let mut driver = driver();
        assert!(driver.describe_table("users").is_empty());
    }

    #[test]
    fn test_local_cache_short_circuits_execution() {
        let mut driver = driver();
        let query = QueryModel::new(QueryKind::Select, "users")
            .with_cache("users.all", std::time::Duration::from_secs(60));

        driver.query(&query).unwrap();
        driver.query(&query).unwrap();
        assert_eq!(driver.connection.calls, vec!["find"]);
    }
}
