use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::collection::Collection;
use crate::config::DbConfig;
use crate::errors::{ErrorKind, JsonDbError, JsonDbResult};
use crate::functions::FunctionRegistry;
use crate::query::{execute_query, parse_query, Row};
use crate::store::Storage;

/// The registry of named collections and the entry point for queries.
///
/// `Database` is constructed explicitly and is a cheap handle: clones share
/// the same collections. The collection map is guarded by a reader/writer
/// lock; creating or dropping a collection takes it exclusively, lookups and
/// queries share it.
///
/// # Examples
///
/// ```rust
/// use jsondb::common::Value;
/// use jsondb::database::Database;
/// use jsondb::doc;
/// use jsondb::store::Storage;
///
/// let db = Database::new();
/// let users = db.create_collection("users", Storage::memory()).unwrap();
/// users.insert(&doc!("u1", { name: "Ivan", active: true })).unwrap();
/// users.insert(&doc!("u2", { name: "Mara", active: false })).unwrap();
///
/// let rows = db.query("SELECT name FROM users WHERE active = true").unwrap();
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0]["name"], Value::from("Ivan"));
/// ```
#[derive(Clone, Default)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

#[derive(Default)]
struct DatabaseInner {
    collections: RwLock<HashMap<String, Collection>>,
    config: DbConfig,
    functions: FunctionRegistry,
}

impl Database {
    /// Creates an empty database with the default configuration.
    pub fn new() -> Database {
        Database::default()
    }

    /// Creates an empty database whose [Database::open_collection] uses `config`.
    pub fn with_config(config: DbConfig) -> Database {
        Database {
            inner: Arc::new(DatabaseInner {
                collections: RwLock::new(HashMap::new()),
                config,
                functions: FunctionRegistry::new(),
            }),
        }
    }

    pub fn config(&self) -> &DbConfig {
        &self.inner.config
    }

    /// Registers a new collection backed by `storage`.
    ///
    /// # Errors
    /// * `InvalidArgument` if the name is empty
    /// * `AlreadyExists` if a collection with this name exists
    pub fn create_collection(&self, name: &str, storage: Storage) -> JsonDbResult<Collection> {
        if name.is_empty() {
            log::error!("Collection name cannot be empty");
            return Err(JsonDbError::new(
                "Collection name cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }

        let mut collections = self.inner.collections.write();
        if collections.contains_key(name) {
            log::error!("Collection {} already exists", name);
            return Err(JsonDbError::new(
                &format!("Collection {} already exists", name),
                ErrorKind::AlreadyExists,
            ));
        }

        let collection = Collection::new(name, storage);
        log::debug!("Created collection {} on {} storage", name, collection.storage().kind());
        collections.insert(name.to_string(), collection.clone());
        Ok(collection)
    }

    /// Registers a new collection with storage created from the database configuration.
    pub fn open_collection(&self, name: &str) -> JsonDbResult<Collection> {
        if self.has_collection(name) {
            log::error!("Collection {} already exists", name);
            return Err(JsonDbError::new(
                &format!("Collection {} already exists", name),
                ErrorKind::AlreadyExists,
            ));
        }
        let storage = self.inner.config.create_storage(name)?;
        self.create_collection(name, storage)
    }

    pub fn get_collection(&self, name: &str) -> JsonDbResult<Collection> {
        match self.inner.collections.read().get(name) {
            Some(collection) => Ok(collection.clone()),
            None => {
                log::error!("Collection {} not found", name);
                Err(JsonDbError::new(
                    &format!("Collection {} not found", name),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.inner.collections.read().contains_key(name)
    }

    /// Collection names in ascending order.
    pub fn list_collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Removes a collection and discards its indexes.
    ///
    /// Handles to the collection still held elsewhere fail every later
    /// operation with `InvalidOperation`. Persisted files are left on disk.
    pub fn drop_collection(&self, name: &str) -> JsonDbResult<()> {
        let mut collections = self.inner.collections.write();
        match collections.remove(name) {
            Some(collection) => {
                collection.mark_dropped();
                log::debug!("Dropped collection {}", name);
                Ok(())
            }
            None => {
                log::error!("Collection {} not found", name);
                Err(JsonDbError::new(
                    &format!("Collection {} not found", name),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    /// Parses and runs a query against the current collections.
    ///
    /// # Errors
    /// * `InvalidArgument` for malformed query text
    /// * `NotFound` if the source collection does not exist
    pub fn query(&self, text: &str) -> JsonDbResult<Vec<Row>> {
        let query = parse_query(text)?;
        let collections = self.inner.collections.read();
        execute_query(&query, &collections)
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.inner.functions
    }
}
