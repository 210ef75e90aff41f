use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::collection::Document;
use crate::errors::{ErrorKind, JsonDbError, JsonDbResult};
use crate::store::StorageProvider;

/// In-memory document storage.
///
/// Documents live in a map guarded by a single reader/writer lock and are
/// lost when the last handle is dropped. Suitable for tests and temporary
/// collections.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStorage {
    inner: Arc<InMemoryStorageInner>,
}

impl InMemoryStorage {
    pub fn new() -> InMemoryStorage {
        InMemoryStorage {
            inner: Arc::new(InMemoryStorageInner::new()),
        }
    }

    /// Number of documents currently held.
    pub fn len(&self) -> usize {
        self.inner.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageProvider for InMemoryStorage {
    fn save(&self, document: &Document) -> JsonDbResult<()> {
        self.inner.save(document)
    }

    fn get(&self, id: &str) -> JsonDbResult<Document> {
        self.inner.get(id)
    }

    fn delete(&self, id: &str) -> JsonDbResult<()> {
        self.inner.delete(id)
    }

    fn list(&self) -> JsonDbResult<Vec<Document>> {
        self.inner.list()
    }
}

#[derive(Debug)]
struct InMemoryStorageInner {
    documents: RwLock<HashMap<String, Document>>,
}

impl Default for InMemoryStorageInner {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorageInner {
    fn new() -> InMemoryStorageInner {
        InMemoryStorageInner {
            documents: RwLock::new(HashMap::new()),
        }
    }

    fn save(&self, document: &Document) -> JsonDbResult<()> {
        self.documents
            .write()
            .insert(document.id().to_string(), document.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> JsonDbResult<Document> {
        match self.documents.read().get(id) {
            Some(document) => Ok(document.clone()),
            None => {
                log::error!("Document {} not found", id);
                Err(JsonDbError::new(
                    &format!("Document {} not found", id),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    fn delete(&self, id: &str) -> JsonDbResult<()> {
        match self.documents.write().remove(id) {
            Some(_) => Ok(()),
            None => {
                log::error!("Document {} not found", id);
                Err(JsonDbError::new(
                    &format!("Document {} not found", id),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    fn list(&self) -> JsonDbResult<Vec<Document>> {
        Ok(self.documents.read().values().cloned().collect())
    }
}
