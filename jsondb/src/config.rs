use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use crate::common::DEFAULT_BTREE_ORDER;
use crate::errors::{ErrorKind, JsonDbError, JsonDbResult};
use crate::index::{btree_index, IndexOptions};
use crate::store::{FileStorage, InMemoryStorage, Storage};

/// Where collection documents live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageType {
    /// In process memory only.
    #[default]
    Memory,
    /// One JSON file per document under `<data_dir>/<collection>/`.
    File,
}

impl Display for StorageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::Memory => write!(f, "memory"),
            StorageType::File => write!(f, "file"),
        }
    }
}

/// Database configuration and storage factory.
///
/// The defaults are in-memory storage, data directory `./data`, cache on
/// and B-tree order 5.
///
/// # Examples
///
/// ```rust
/// use jsondb::config::{DbConfig, StorageType};
///
/// let config = DbConfig::file_storage("/tmp/jsondb", false).default_btree_order(8);
/// assert_eq!(config.storage_type(), StorageType::File);
/// assert_eq!(config.index_options().order(), 8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DbConfig {
    storage_type: StorageType,
    data_dir: PathBuf,
    use_cache: bool,
    default_btree_order: usize,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            storage_type: StorageType::Memory,
            data_dir: PathBuf::from("./data"),
            use_cache: true,
            default_btree_order: DEFAULT_BTREE_ORDER,
        }
    }
}

impl DbConfig {
    pub fn new() -> DbConfig {
        DbConfig::default()
    }

    /// File-backed storage rooted at `data_dir`.
    pub fn file_storage(data_dir: impl AsRef<Path>, use_cache: bool) -> DbConfig {
        DbConfig {
            storage_type: StorageType::File,
            data_dir: data_dir.as_ref().to_path_buf(),
            use_cache,
            ..DbConfig::default()
        }
    }

    pub fn memory_storage() -> DbConfig {
        DbConfig::default()
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn use_cache(&self) -> bool {
        self.use_cache
    }

    pub fn btree_order(&self) -> usize {
        self.default_btree_order
    }

    pub fn with_storage_type(mut self, storage_type: StorageType) -> DbConfig {
        self.storage_type = storage_type;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> DbConfig {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> DbConfig {
        self.use_cache = use_cache;
        self
    }

    pub fn default_btree_order(mut self, order: usize) -> DbConfig {
        self.default_btree_order = order;
        self
    }

    /// Index options for a B-tree of the configured default order.
    pub fn index_options(&self) -> IndexOptions {
        btree_index(self.default_btree_order)
    }

    /// Creates the storage backend for a collection.
    ///
    /// File storage is placed in `<data_dir>/<collection>`; the directory is
    /// created if missing. The collection name must then be a single path
    /// component, otherwise `InvalidArgument` is returned.
    pub fn create_storage(&self, collection: &str) -> JsonDbResult<Storage> {
        match self.storage_type {
            StorageType::Memory => Ok(Storage::Memory(InMemoryStorage::new())),
            StorageType::File => {
                validate_directory_name(collection)?;
                Ok(Storage::File(FileStorage::new(
                    self.data_dir.join(collection),
                    self.use_cache,
                )?))
            }
        }
    }
}

fn validate_directory_name(collection: &str) -> JsonDbResult<()> {
    if collection.is_empty()
        || collection == "."
        || collection == ".."
        || collection.contains(['/', '\\', '\0'])
    {
        log::error!("Collection name {:?} cannot be used as a directory name", collection);
        return Err(JsonDbError::new(
            &format!("Collection name {:?} cannot be used as a directory name", collection),
            ErrorKind::InvalidArgument,
        ));
    }
    Ok(())
}
