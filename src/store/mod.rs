//! Option store: named JSON documents with last-write-wins semantics.
//!
//! Every settings module owns one key. Values are whole documents; there
//! are no partial updates and no transactions across keys.
//!
//! | Implementation  | Backing                                   |
//! |-----------------|-------------------------------------------|
//! | `JsonFileStore` | One JSON file, re-read on every call      |
//! | `MemoryStore`   | In-process map (tests only)               |

mod file;
#[cfg(test)]
mod memory;

pub use file::JsonFileStore;
#[cfg(test)]
pub use memory::MemoryStore;

use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

/// A JSON object with insertion-ordered keys.
pub type Document = Map<String, Value>;

/// Option store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{0}` is not valid JSON")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("`{0}` must contain a JSON object at the top level")]
    NotAnObject(PathBuf),

    #[error("option `{0}` is not a JSON object")]
    NotADocument(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value store for option documents.
///
/// Implementations assume a trusted, low-frequency writer and take no
/// locks: concurrent writers race and the last one wins.
pub trait OptionStore {
    /// Read the document stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<Document>>;

    /// Replace the document stored under `key`.
    fn set(&self, key: &str, document: Document) -> StoreResult<()>;

    /// Read `key`, falling back to `fallback` when nothing is stored.
    fn get_or(&self, key: &str, fallback: Document) -> StoreResult<Document> {
        Ok(self.get(key)?.unwrap_or(fallback))
    }
}

/// Interpret a stored value as a document.
fn as_document(key: &str, value: Value) -> StoreResult<Document> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotADocument(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_or_fallback() {
        let store = MemoryStore::new();
        let fallback = json!({"a": 1}).as_object().cloned().unwrap();
        assert_eq!(store.get_or("missing", fallback.clone()).unwrap(), fallback);
    }

    #[test]
    fn test_as_document_rejects_scalars() {
        assert!(matches!(
            as_document("k", json!(3)),
            Err(StoreError::NotADocument(key)) if key == "k"
        ));
        assert!(as_document("k", json!({})).is_ok());
    }
}
