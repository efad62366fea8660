//! Store-native operations
//!
//! The closed set of operations the translation layer can emit. Each
//! variant carries everything the connection needs to execute it; the
//! diagnostic statement renders from the same data, so what is logged is
//! exactly what is dispatched.

use crate::value::{Document, NativeValue};

/// A store-native operation ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeOperation {
    /// Read documents matching a filter
    Find {
        /// Target collection
        collection: String,
        /// Filter predicate; empty object matches everything
        filter: NativeValue,
        /// Field projection
        projection: Document,
        /// Sort specification
        sort: Option<Document>,
        /// Maximum documents to return
        limit: Option<u64>,
        /// Documents to skip
        skip: Option<u64>,
        /// Return a count instead of documents
        count_only: bool,
    },
    /// Group documents over a set of key fields
    Group {
        /// Target collection
        collection: String,
        /// Grouping key fields
        keys: Vec<String>,
        /// Grouping condition
        condition: NativeValue,
    },
    /// Insert one document; the store assigns identity
    Insert {
        /// Target collection
        collection: String,
        /// Document payload, identity field already stripped
        document: Document,
    },
    /// Insert a batch of documents
    InsertMany {
        /// Target collection
        collection: String,
        /// Document payloads, identity fields already stripped
        documents: Vec<Document>,
    },
    /// Mutate matching documents
    Update {
        /// Target collection
        collection: String,
        /// Filter predicate
        filter: NativeValue,
        /// Field mutations
        changes: Document,
        /// Statement options passed through verbatim
        options: Document,
    },
    /// Remove matching documents
    Remove {
        /// Target collection
        collection: String,
        /// Filter predicate
        filter: NativeValue,
        /// Remove only the first match
        just_one: bool,
    },
    /// Remove every document in a collection
    RemoveAll {
        /// Target collection
        collection: String,
    },
    /// Create a collection
    CreateCollection {
        /// Collection name
        name: String,
        /// Creation options
        options: Document,
    },
    /// Create an index
    CreateIndex {
        /// Target collection
        collection: String,
        /// Indexed fields
        keys: Document,
        /// Index options
        options: Document,
    },
    /// Drop a collection
    DropCollection {
        /// Target collection
        collection: String,
    },
    /// Drop an index
    DropIndex {
        /// Target collection
        collection: String,
        /// Indexed fields naming the index
        keys: Document,
    },
    /// A literal pre-built command, emitted as-is
    Command {
        /// Command body
        body: NativeValue,
    },
}

impl NativeOperation {
    /// Returns the target collection, if the operation has one
    pub fn collection(&self) -> Option<&str> {
        match self {
            NativeOperation::Find { collection, .. }
            | NativeOperation::Group { collection, .. }
            | NativeOperation::Insert { collection, .. }
            | NativeOperation::InsertMany { collection, .. }
            | NativeOperation::Update { collection, .. }
            | NativeOperation::Remove { collection, .. }
            | NativeOperation::RemoveAll { collection }
            | NativeOperation::CreateIndex { collection, .. }
            | NativeOperation::DropCollection { collection }
            | NativeOperation::DropIndex { collection, .. } => Some(collection),
            NativeOperation::CreateCollection { name, .. } => Some(name),
            NativeOperation::Command { .. } => None,
        }
    }

    /// Returns the primitive name for logging
    pub fn name(&self) -> &'static str {
        match self {
            NativeOperation::Find { .. } => "find",
            NativeOperation::Group { .. } => "group",
            NativeOperation::Insert { .. } => "insert",
            NativeOperation::InsertMany { .. } => "insertMany",
            NativeOperation::Update { .. } => "update",
            NativeOperation::Remove { .. } => "remove",
            NativeOperation::RemoveAll { .. } => "removeAll",
            NativeOperation::CreateCollection { .. } => "createCollection",
            NativeOperation::CreateIndex { .. } => "createIndex",
            NativeOperation::DropCollection { .. } => "drop",
            NativeOperation::DropIndex { .. } => "dropIndex",
            NativeOperation::Command { .. } => "runCommand",
        }
    }
}
