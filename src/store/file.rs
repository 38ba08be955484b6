//! Option store persisted as one JSON file.
//!
//! ```json
//! {
//!   "embo_colors_options": { "background_color": "#b22222", ... },
//!   "embo_custom_css_options": { "load_type": "ajax", ... }
//! }
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::Value;

use super::{Document, OptionStore, StoreError, StoreResult, as_document};
use crate::debug;

/// Option store backed by a single JSON file.
///
/// The file is read on every call and rewritten whole on every `set`, so
/// separate processes always see each other's last write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the whole file. A missing or empty file is an empty store.
    fn read_all(&self) -> StoreResult<Document> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(err) => return Err(StoreError::Io(self.path.clone(), err)),
        };
        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::NotAnObject(self.path.clone())),
            Err(err) => Err(StoreError::Json(self.path.clone(), err)),
        }
    }

    fn write_all(&self, documents: &Document) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(documents)
            .map_err(|err| StoreError::Json(self.path.clone(), err))?;

        // Skip write if content unchanged
        if fs::read_to_string(&self.path).is_ok_and(|existing| existing == content) {
            debug!("store"; "{} unchanged", self.path.display());
            return Ok(());
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| StoreError::Io(parent.to_path_buf(), err))?;
        }
        fs::write(&self.path, content).map_err(|err| StoreError::Io(self.path.clone(), err))
    }
}

impl OptionStore for JsonFileStore {
    fn get(&self, key: &str) -> StoreResult<Option<Document>> {
        let mut documents = self.read_all()?;
        documents
            .remove(key)
            .map(|value| as_document(key, value))
            .transpose()
    }

    fn set(&self, key: &str, document: Document) -> StoreResult<()> {
        let mut documents = self.read_all()?;
        documents.insert(key.to_string(), Value::Object(document));
        self.write_all(&documents)?;
        debug!("store"; "wrote `{}` to {}", key, self.path.display());
        Ok(())
    }
}
