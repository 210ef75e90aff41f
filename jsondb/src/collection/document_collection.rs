use std::collections::HashMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::collection::Document;
use crate::common::Value;
use crate::errors::{ErrorKind, JsonDbError, JsonDbResult};
use crate::index::{BTreeStats, IndexOptions, IndexProvider, SecondaryIndex};
use crate::store::{Storage, StorageProvider};

/// A named set of documents plus its secondary indexes.
///
/// `Collection` is a cheap handle; clones refer to the same collection.
///
/// # Thread Safety
/// Mutations (`insert`, `update`, `delete`, `create_index`, `drop_index`)
/// take the collection's write lock for their whole duration, so every index
/// changes together with the documents. Reads and query scans take the read
/// lock and never observe a half-applied mutation.
///
/// Once the collection is dropped from its database every operation on a
/// remaining handle fails with [ErrorKind::InvalidOperation]. The check runs
/// under the lock, so a call queued behind the drop fails too.
#[derive(Clone, Debug)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

impl Collection {
    /// Creates a collection backed by the given storage.
    ///
    /// Documents already present in the storage are part of the collection;
    /// no index exists until created with [Collection::create_index].
    pub fn new(name: &str, storage: Storage) -> Collection {
        Collection {
            inner: Arc::new(CollectionInner {
                name: name.to_string(),
                storage,
                indexes: RwLock::new(HashMap::new()),
                dropped: AtomicBool::new(false),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    pub fn is_dropped(&self) -> bool {
        self.inner.dropped.load(Ordering::Acquire)
    }

    /// Inserts a document, replacing any document with the same identifier.
    ///
    /// The document is saved first and then added to every index. If an
    /// index fails, the error is returned but the document stays persisted.
    ///
    /// # Errors
    /// * `InvalidArgument` if the identifier is empty
    /// * any storage error from the backend
    pub fn insert(&self, document: &Document) -> JsonDbResult<()> {
        validate_document_id(document)?;

        let mut indexes = self.inner.indexes.write();
        self.inner.ensure_opened()?;
        self.inner.storage.save(document)?;
        for index in indexes.values_mut() {
            index.add(document)?;
        }
        Ok(())
    }

    /// Replaces a stored document with a new version.
    ///
    /// The prior version, if it can be fetched, is removed from every index
    /// before the new version is saved and indexed.
    pub fn update(&self, document: &Document) -> JsonDbResult<()> {
        validate_document_id(document)?;

        let mut indexes = self.inner.indexes.write();
        self.inner.ensure_opened()?;
        if let Ok(prior) = self.inner.storage.get(document.id()) {
            for index in indexes.values_mut() {
                index.remove(prior.id())?;
            }
        }

        self.inner.storage.save(document)?;
        for index in indexes.values_mut() {
            index.add(document)?;
        }
        Ok(())
    }

    /// Deletes a document by identifier.
    ///
    /// The identifier is removed from every index before the backend delete,
    /// so a failing delete (e.g. `NotFound`) still leaves the indexes without it.
    pub fn delete(&self, id: &str) -> JsonDbResult<()> {
        let mut indexes = self.inner.indexes.write();
        self.inner.ensure_opened()?;
        for index in indexes.values_mut() {
            index.remove(id)?;
        }
        self.inner.storage.delete(id)
    }

    pub fn get_document(&self, id: &str) -> JsonDbResult<Document> {
        let _guard = self.inner.indexes.read();
        self.inner.ensure_opened()?;
        self.inner.storage.get(id)
    }

    /// Every document in backend enumeration order.
    pub fn list_documents(&self) -> JsonDbResult<Vec<Document>> {
        let _guard = self.inner.indexes.read();
        self.inner.ensure_opened()?;
        self.inner.storage.list()
    }

    pub fn size(&self) -> JsonDbResult<usize> {
        Ok(self.list_documents()?.len())
    }

    /// Builds a secondary index on `field` from the documents currently stored.
    ///
    /// The index is inserted into the collection only once it is fully built.
    ///
    /// # Arguments
    /// * `field` - Name of the top-level field to index
    /// * `options` - Index type and B-tree order
    ///
    /// # Errors
    /// * `AlreadyExists` if the field is already indexed
    /// * `InvalidArgument` for an empty field, an unknown index type or an order below 2
    pub fn create_index(&self, field: &str, options: &IndexOptions) -> JsonDbResult<()> {
        if field.is_empty() {
            log::error!("Index field cannot be empty");
            return Err(JsonDbError::new(
                "Index field cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }

        let mut indexes = self.inner.indexes.write();
        self.inner.ensure_opened()?;
        if indexes.contains_key(field) {
            log::error!(
                "Index on field {} already exists in collection {}",
                field,
                self.inner.name
            );
            return Err(JsonDbError::new(
                &format!(
                    "Index on field {} already exists in collection {}",
                    field, self.inner.name
                ),
                ErrorKind::AlreadyExists,
            ));
        }

        let mut index = SecondaryIndex::new(field, options)?;
        for document in self.inner.storage.list()? {
            index.add(&document)?;
        }

        log::debug!(
            "Built {} index on {}.{} with {} entries",
            index.index_type(),
            self.inner.name,
            field,
            index.len()
        );
        indexes.insert(field.to_string(), index);
        Ok(())
    }

    pub fn drop_index(&self, field: &str) -> JsonDbResult<()> {
        let mut indexes = self.inner.indexes.write();
        self.inner.ensure_opened()?;
        match indexes.remove(field) {
            Some(_) => {
                log::debug!("Dropped index on {}.{}", self.inner.name, field);
                Ok(())
            }
            None => {
                log::error!("Index on field {} not found in collection {}", field, self.inner.name);
                Err(JsonDbError::new(
                    &format!(
                        "Index on field {} not found in collection {}",
                        field, self.inner.name
                    ),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    pub fn has_index(&self, field: &str) -> JsonDbResult<bool> {
        let indexes = self.inner.indexes.read();
        self.inner.ensure_opened()?;
        Ok(indexes.contains_key(field))
    }

    /// Indexed field names, sorted.
    pub fn list_indexes(&self) -> JsonDbResult<Vec<String>> {
        let indexes = self.inner.indexes.read();
        self.inner.ensure_opened()?;
        let mut fields: Vec<String> = indexes.keys().cloned().collect();
        fields.sort();
        Ok(fields)
    }

    /// Shape of the B-tree behind the index on `field`.
    pub fn index_stats(&self, field: &str) -> JsonDbResult<BTreeStats> {
        let indexes = self.inner.indexes.read();
        self.inner.ensure_opened()?;
        Ok(self.inner.find_index(&indexes, field)?.stats())
    }

    /// Returns the documents whose indexed `field` equals `value`.
    ///
    /// Identifiers that no longer resolve in storage are skipped.
    ///
    /// # Errors
    /// * `NotFound` if there is no index on `field`
    pub fn find_by_index(&self, field: &str, value: &Value) -> JsonDbResult<Vec<Document>> {
        let indexes = self.inner.indexes.read();
        self.inner.ensure_opened()?;
        let index = self.inner.find_index(&indexes, field)?;
        let ids = index.search(field, value)?;
        Ok(self.inner.resolve(field, ids))
    }

    /// Returns the documents whose indexed `field` lies within the bounds,
    /// in ascending order of the field value.
    pub fn find_by_range(
        &self,
        field: &str,
        lower: Bound<&Value>,
        upper: Bound<&Value>,
    ) -> JsonDbResult<Vec<Document>> {
        let indexes = self.inner.indexes.read();
        self.inner.ensure_opened()?;
        let index = self.inner.find_index(&indexes, field)?;
        let ids = index.range(lower, upper);
        Ok(self.inner.resolve(field, ids))
    }

    /// Detaches the collection from its database; every later call fails.
    pub(crate) fn mark_dropped(&self) {
        let mut indexes = self.inner.indexes.write();
        self.inner.dropped.store(true, Ordering::Release);
        indexes.clear();
    }
}

#[derive(Debug)]
struct CollectionInner {
    name: String,
    storage: Storage,
    indexes: RwLock<HashMap<String, SecondaryIndex>>,
    dropped: AtomicBool,
}

impl CollectionInner {
    fn ensure_opened(&self) -> JsonDbResult<()> {
        if self.dropped.load(Ordering::Acquire) {
            log::error!("Collection {} is dropped and cannot be accessed", self.name);
            return Err(JsonDbError::new(
                &format!("Collection {} is dropped and cannot be accessed", self.name),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn find_index<'a>(
        &self,
        indexes: &'a HashMap<String, SecondaryIndex>,
        field: &str,
    ) -> JsonDbResult<&'a SecondaryIndex> {
        match indexes.get(field) {
            Some(index) => Ok(index),
            None => {
                log::error!("Index on field {} not found in collection {}", field, self.name);
                Err(JsonDbError::new(
                    &format!("Index on field {} not found in collection {}", field, self.name),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    fn resolve(&self, field: &str, ids: Vec<String>) -> Vec<Document> {
        ids.into_iter()
            .filter_map(|id| match self.storage.get(&id) {
                Ok(document) => Some(document),
                Err(err) => {
                    log::warn!(
                        "Index on {}.{} refers to {} which cannot be loaded: {}",
                        self.name,
                        field,
                        id,
                        err
                    );
                    None
                }
            })
            .collect()
    }
}

fn validate_document_id(document: &Document) -> JsonDbResult<()> {
    if document.id().is_empty() {
        log::error!("Document id cannot be empty");
        return Err(JsonDbError::new(
            "Document id cannot be empty",
            ErrorKind::InvalidArgument,
        ));
    }
    Ok(())
}
