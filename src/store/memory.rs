use std::cell::RefCell;

use rustc_hash::FxHashMap;

use super::{Document, OptionStore, StoreResult};

/// Option store held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<FxHashMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OptionStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Document>> {
        Ok(self.documents.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, document: Document) -> StoreResult<()> {
        self.documents.borrow_mut().insert(key.to_string(), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_last_write_wins() {
        let store = MemoryStore::new();
        let first = json!({"v": 1}).as_object().cloned().unwrap();
        let second = json!({"v": 2}).as_object().cloned().unwrap();

        store.set("opt", first).unwrap();
        store.set("opt", second.clone()).unwrap();
        assert_eq!(store.get("opt").unwrap(), Some(second));
    }
}
