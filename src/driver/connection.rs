//! Connection seam
//!
//! The client library owns the wire; this layer calls exactly the
//! primitives below and nothing else. Read primitives hand back a live
//! cursor, everything else answers with a free-form response map.

use crate::query::FieldMap;
use crate::result::DocumentCursor;
use crate::value::{Document, NativeValue};

use super::errors::DriverResult;

/// Cursor shaping for a read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Sort specification
    pub sort: Option<Document>,
    /// Maximum documents to return
    pub limit: Option<u64>,
    /// Documents to skip
    pub skip: Option<u64>,
}

/// The store primitives the driver dispatches to.
///
/// One connection handle serves one driver, synchronously: one in-flight
/// operation at a time. Timeouts and retry policy live behind this trait,
/// not in the driver.
pub trait StoreConnection {
    /// Reads documents matching a filter
    fn find(
        &mut self,
        collection: &str,
        filter: &NativeValue,
        projection: &Document,
        options: &FindOptions,
    ) -> DriverResult<Box<dyn DocumentCursor>>;

    /// Groups documents over key fields
    fn group(
        &mut self,
        collection: &str,
        keys: &[String],
        condition: &NativeValue,
    ) -> DriverResult<FieldMap>;

    /// Inserts one document; the store assigns identity
    fn insert(&mut self, collection: &str, document: &Document) -> DriverResult<FieldMap>;

    /// Inserts a batch of documents
    fn insert_many(&mut self, collection: &str, documents: &[Document]) -> DriverResult<FieldMap>;

    /// Mutates matching documents
    fn update(
        &mut self,
        collection: &str,
        filter: &NativeValue,
        changes: &Document,
        options: &Document,
    ) -> DriverResult<FieldMap>;

    /// Removes matching documents
    fn remove(
        &mut self,
        collection: &str,
        filter: &NativeValue,
        just_one: bool,
    ) -> DriverResult<FieldMap>;

    /// Removes every document in a collection
    fn remove_all(&mut self, collection: &str) -> DriverResult<FieldMap>;

    /// Creates a collection
    fn create_collection(&mut self, name: &str, options: &Document) -> DriverResult<FieldMap>;

    /// Creates an index
    fn create_index(
        &mut self,
        collection: &str,
        keys: &Document,
        options: &Document,
    ) -> DriverResult<FieldMap>;

    /// Drops a collection
    fn drop_collection(&mut self, collection: &str) -> DriverResult<FieldMap>;

    /// Drops an index named by its field spec
    fn drop_index(&mut self, collection: &str, keys: &Document) -> DriverResult<FieldMap>;

    /// Runs a literal command
    fn run_command(&mut self, body: &NativeValue) -> DriverResult<FieldMap>;

    /// Lists collection names in the selected database
    fn list_collections(&mut self) -> DriverResult<Vec<String>>;
}
