use crate::collection::Document;
use crate::errors::JsonDbResult;
use crate::store::{FileStorage, InMemoryStorage};

/// Capability contract of a document storage backend.
///
/// # Thread Safety
/// Implementers guard their state with a reader/writer lock: `get` and `list`
/// share it, `save` and `delete` take it exclusively.
pub trait StorageProvider: Send + Sync {
    /// Persists a document, replacing any document with the same identifier.
    ///
    /// # Arguments
    /// * `document` - The document to store
    ///
    /// # Returns
    /// * `Ok(())` if the document was written
    /// * `Err(JsonDbError)` if the backend rejected the identifier or the write failed
    fn save(&self, document: &Document) -> JsonDbResult<()>;

    /// Retrieves a document by identifier.
    ///
    /// # Returns
    /// * `Ok(Document)` - a copy of the stored document
    /// * `Err(JsonDbError)` with `NotFound` if no document has this identifier
    fn get(&self, id: &str) -> JsonDbResult<Document>;

    /// Removes a document by identifier.
    ///
    /// # Returns
    /// * `Ok(())` if the document was removed
    /// * `Err(JsonDbError)` with `NotFound` if no document has this identifier
    fn delete(&self, id: &str) -> JsonDbResult<()>;

    /// Returns every stored document. Order is not significant.
    fn list(&self) -> JsonDbResult<Vec<Document>>;
}

/// A storage backend owned by a collection.
///
/// `Storage` is a cheap handle; clones share the same underlying state.
///
/// # Examples
///
/// ```rust
/// use jsondb::doc;
/// use jsondb::store::{Storage, StorageProvider};
///
/// let storage = Storage::memory();
/// storage.save(&doc!("u1", { name: "Ivan" })).unwrap();
/// assert_eq!(storage.get("u1").unwrap().id(), "u1");
/// ```
#[derive(Clone, Debug)]
pub enum Storage {
    Memory(InMemoryStorage),
    File(FileStorage),
}

impl Storage {
    /// Creates a new, empty in-memory storage.
    pub fn memory() -> Self {
        Storage::Memory(InMemoryStorage::new())
    }

    /// Opens a file-backed storage rooted at `dir`, creating the directory if needed.
    pub fn file(dir: impl AsRef<std::path::Path>, use_cache: bool) -> JsonDbResult<Self> {
        Ok(Storage::File(FileStorage::new(dir, use_cache)?))
    }

    /// Short name of the backend, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Storage::Memory(_) => "memory",
            Storage::File(_) => "file",
        }
    }
}

impl StorageProvider for Storage {
    fn save(&self, document: &Document) -> JsonDbResult<()> {
        match self {
            Storage::Memory(storage) => storage.save(document),
            Storage::File(storage) => storage.save(document),
        }
    }

    fn get(&self, id: &str) -> JsonDbResult<Document> {
        match self {
            Storage::Memory(storage) => storage.get(id),
            Storage::File(storage) => storage.get(id),
        }
    }

    fn delete(&self, id: &str) -> JsonDbResult<()> {
        match self {
            Storage::Memory(storage) => storage.delete(id),
            Storage::File(storage) => storage.delete(id),
        }
    }

    fn list(&self) -> JsonDbResult<Vec<Document>> {
        match self {
            Storage::Memory(storage) => storage.list(),
            Storage::File(storage) => storage.list(),
        }
    }
}

impl From<InMemoryStorage> for Storage {
    fn from(storage: InMemoryStorage) -> Self {
        Storage::Memory(storage)
    }
}

impl From<FileStorage> for Storage {
    fn from(storage: FileStorage) -> Self {
        Storage::File(storage)
    }
}
