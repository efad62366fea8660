//! Diagnostic statement rendering
//!
//! Produces the human-readable reproduction of a store-native operation:
//! one line of shell-style text with deterministic JSON fragments,
//! terminated by `;`. The text is a debugging and audit artifact, never
//! executed, but it must be byte-stable for identical input so golden
//! tests can pin it.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::value::{Document, NativeValue};

use super::operation::NativeOperation;

/// Placeholder rendered when a result carries no reproducible operation
pub const UNKNOWN_STATEMENT: &str = "(unknown statement)";

fn doc_json(doc: &Document) -> String {
    NativeValue::Object(doc.clone()).to_json_repr().to_string()
}

fn value_json(value: &NativeValue) -> String {
    value.to_json_repr().to_string()
}

/// Renders the diagnostic statement for an operation
pub fn render(op: &NativeOperation) -> String {
    let statement = match op {
        NativeOperation::Find {
            collection,
            filter,
            projection,
            sort,
            limit,
            skip,
            count_only,
        } => {
            let mut text = format!(
                "db.{}.find({}, {})",
                collection,
                value_json(filter),
                doc_json(projection)
            );
            if let Some(order) = sort {
                let _ = write!(text, ".sort({})", doc_json(order));
            }
            if let Some(n) = limit {
                let _ = write!(text, ".limit({})", n);
            }
            if let Some(n) = skip {
                let _ = write!(text, ".skip({})", n);
            }
            if *count_only {
                text.push_str(".count()");
            }
            text
        }
        NativeOperation::Group {
            collection,
            keys,
            condition,
        } => {
            let keys_json = serde_json::to_string(keys).unwrap_or_else(|_| "[]".to_string());
            format!(
                "db.{}.group({}, function(){{}}, [\"items\":[]], null, {}, null)",
                collection,
                keys_json,
                value_json(condition)
            )
        }
        NativeOperation::Insert {
            collection,
            document,
        } => format!("db.{}.insert({})", collection, doc_json(document)),
        NativeOperation::InsertMany {
            collection,
            documents,
        } => {
            let rows: Vec<String> = documents.iter().map(doc_json).collect();
            format!("db.{}.insert([{}])", collection, rows.join(","))
        }
        NativeOperation::Update {
            collection,
            filter,
            changes,
            options,
        } => format!(
            "db.{}.update({}, {}, {})",
            collection,
            value_json(filter),
            doc_json(changes),
            doc_json(options)
        ),
        NativeOperation::Remove {
            collection,
            filter,
            just_one,
        } => format!(
            "db.{}.remove({}, {})",
            collection,
            value_json(filter),
            just_one
        ),
        NativeOperation::RemoveAll { collection } => format!("db.{}.remove()", collection),
        NativeOperation::CreateCollection { name, options } => format!(
            "db.createCollection({:?}, {})",
            name,
            doc_json(options)
        ),
        NativeOperation::CreateIndex {
            collection,
            keys,
            options,
        } => format!(
            "db.{}.ensureIndex({}, {})",
            collection,
            doc_json(keys),
            doc_json(options)
        ),
        NativeOperation::DropCollection { collection } => format!("db.{}.drop()", collection),
        NativeOperation::DropIndex { collection, keys } => {
            format!("db.{}.deleteIndex({})", collection, doc_json(keys))
        }
        NativeOperation::Command { body } => format!("db.runCommand({})", value_json(body)),
    };

    statement + ";"
}

/// SHA-256 digest of a rendered statement, hex encoded.
///
/// Identical statements share a digest, so repeated queries can be
/// correlated in trace output without logging full payloads twice.
pub fn statement_digest(statement: &str) -> String {
    let digest = Sha256::digest(statement.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}
