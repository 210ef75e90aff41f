use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::collection::Document;
use crate::common::{DOC_FILE_EXTENSION, DOC_TEMP_EXTENSION};
use crate::errors::{ErrorKind, JsonDbError, JsonDbResult};
use crate::store::StorageProvider;

/// File-backed document storage.
///
/// Each document is written to `<dir>/<id>.json` in the persisted layout
/// `{"_id": .., "content": {..}}`. A write goes to a `<id>.json.tmp` sibling
/// first and is renamed over the target, so a reader never sees a partial
/// file.
///
/// With the cache enabled, documents read or written through this storage
/// are mirrored in memory. The cache is updated only after the disk
/// operation succeeded, so cache and disk agree after every successful
/// mutation.
///
/// # Thread Safety
/// A single reader/writer lock covers both cache and directory. `save` and
/// `delete` take it exclusively. `get` and `list` share it: cache hits are
/// served under the read lock, misses are loaded from disk without the lock
/// and filled in afterwards under the write lock. A fill is dropped when a
/// `save` or `delete` ran in between.
#[derive(Clone, Debug)]
pub struct FileStorage {
    inner: Arc<FileStorageInner>,
}

impl FileStorage {
    /// Opens a file storage rooted at `dir`, creating the directory tree if needed.
    ///
    /// # Arguments
    /// * `dir` - Directory holding one file per document
    /// * `use_cache` - Whether to mirror documents in memory
    ///
    /// # Returns
    /// * `Ok(FileStorage)` if the directory exists or could be created
    /// * `Err(JsonDbError)` with `IOError` otherwise
    pub fn new(dir: impl AsRef<Path>, use_cache: bool) -> JsonDbResult<FileStorage> {
        let dir = dir.as_ref().to_path_buf();
        if let Err(err) = fs::create_dir_all(&dir) {
            log::error!("Failed to create storage directory {}: {}", dir.display(), err);
            return Err(JsonDbError::new(
                &format!("Failed to create storage directory {}: {}", dir.display(), err),
                ErrorKind::IOError,
            ));
        }

        log::debug!("Opened file storage at {} (cache: {})", dir.display(), use_cache);
        Ok(FileStorage {
            inner: Arc::new(FileStorageInner {
                dir,
                use_cache,
                cache: RwLock::new(DocumentCache::default()),
            }),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    pub fn use_cache(&self) -> bool {
        self.inner.use_cache
    }

    /// Number of documents currently mirrored in the cache.
    pub fn cached_len(&self) -> usize {
        self.inner.cache.read().documents.len()
    }
}

impl StorageProvider for FileStorage {
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
struct FileStorageInner {
    dir: PathBuf,
    use_cache: bool,
    cache: RwLock<DocumentCache>,
}

#[derive(Debug, Default)]
struct DocumentCache {
    documents: HashMap<String, Document>,
    // bumped by every save and delete
    generation: u64,
}

impl DocumentCache {
    fn fill(&mut self, generation: u64, loaded: Vec<(String, Document)>) {
        if self.generation != generation {
            log::debug!("Discarding {} loaded documents after a concurrent write", loaded.len());
            return;
        }
        for (id, document) in loaded {
            self.documents.entry(id).or_insert(document);
        }
    }
}

impl FileStorageInner {
    fn save(&self, document: &Document) -> JsonDbResult<()> {
        let id = document.id();
        validate_id(id)?;

        let mut cache = self.cache.write();
        let bytes = serde_json::to_vec_pretty(document)?;
        let target = self.document_path(id);
        let temp = self.temp_path(id);

        if let Err(err) = fs::write(&temp, bytes) {
            log::error!("Failed to write document {}: {}", id, err);
            return Err(JsonDbError::new(
                &format!("Failed to write document {}: {}", id, err),
                ErrorKind::IOError,
            ));
        }

        if let Err(err) = fs::rename(&temp, &target) {
            // the target is untouched; the scratch file is best-effort cleanup
            let _ = fs::remove_file(&temp);
            log::error!("Failed to move document {} into place: {}", id, err);
            return Err(JsonDbError::new(
                &format!("Failed to move document {} into place: {}", id, err),
                ErrorKind::IOError,
            ));
        }

        cache.generation += 1;
        if self.use_cache {
            cache.documents.insert(id.to_string(), document.clone());
        }
        Ok(())
    }

    fn get(&self, id: &str) -> JsonDbResult<Document> {
        validate_id(id)?;
        if !self.use_cache {
            let _cache = self.cache.read();
            return self.load(id);
        }

        let generation = {
            let cache = self.cache.read();
            if let Some(document) = cache.documents.get(id) {
                return Ok(document.clone());
            }
            cache.generation
        };

        let document = self.load(id)?;
        self.cache
            .write()
            .fill(generation, vec![(id.to_string(), document.clone())]);
        Ok(document)
    }

    fn delete(&self, id: &str) -> JsonDbResult<()> {
        validate_id(id)?;

        let mut cache = self.cache.write();
        let path = self.document_path(id);
        if let Err(err) = fs::remove_file(&path) {
            if err.kind() == std::io::ErrorKind::NotFound {
                log::error!("Document {} not found", id);
                return Err(JsonDbError::new(
                    &format!("Document {} not found", id),
                    ErrorKind::NotFound,
                ));
            }
            log::error!("Failed to delete document {}: {}", id, err);
            return Err(JsonDbError::new(
                &format!("Failed to delete document {}: {}", id, err),
                ErrorKind::IOError,
            ));
        }

        cache.generation += 1;
        cache.documents.remove(id);
        Ok(())
    }

    fn list(&self) -> JsonDbResult<Vec<Document>> {
        let (documents, loaded, generation) = {
            let cache = self.cache.read();
            let (documents, loaded) = self.scan(&cache.documents)?;
            (documents, loaded, cache.generation)
        };

        if self.use_cache && !loaded.is_empty() {
            self.cache.write().fill(generation, loaded);
        }
        Ok(documents)
    }

    // Documents found on disk plus the ones not served from `cached`, keyed
    // by file stem.
    fn scan(
        &self,
        cached: &HashMap<String, Document>,
    ) -> JsonDbResult<(Vec<Document>, Vec<(String, Document)>)> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::error!("Failed to read storage directory {}: {}", self.dir.display(), err);
                return Err(JsonDbError::new(
                    &format!("Failed to read storage directory {}: {}", self.dir.display(), err),
                    ErrorKind::IOError,
                ));
            }
        };

        let mut documents = Vec::new();
        let mut loaded = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    log::warn!("Skipping unreadable entry in {}: {}", self.dir.display(), err);
                    continue;
                }
            };

            let extension = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || extension != Some(DOC_FILE_EXTENSION) {
                continue;
            }

            let id = match path.file_stem().and_then(|s| s.to_str()) {
                Some(id) => id.to_string(),
                None => {
                    log::warn!("Skipping file with a non UTF-8 name {}", path.display());
                    continue;
                }
            };

            if let Some(document) = cached.get(&id) {
                documents.push(document.clone());
                continue;
            }

            match self.load(&id) {
                Ok(document) if document.id() != id => {
                    log::warn!(
                        "Skipping document file {}: it holds document {}",
                        path.display(),
                        document.id()
                    );
                }
                Ok(document) => {
                    if self.use_cache {
                        loaded.push((id, document.clone()));
                    }
                    documents.push(document);
                }
                Err(err) => {
                    log::warn!("Skipping document file {}: {}", path.display(), err);
                }
            }
        }
        Ok((documents, loaded))
    }

    fn load(&self, id: &str) -> JsonDbResult<Document> {
        let path = self.document_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::error!("Document {} not found", id);
                return Err(JsonDbError::new(
                    &format!("Document {} not found", id),
                    ErrorKind::NotFound,
                ));
            }
            Err(err) => {
                log::error!("Failed to read document {}: {}", id, err);
                return Err(JsonDbError::new(
                    &format!("Failed to read document {}: {}", id, err),
                    ErrorKind::IOError,
                ));
            }
        };

        match serde_json::from_slice::<Document>(&bytes) {
            Ok(document) => Ok(document),
            Err(err) => {
                log::error!("Failed to decode document {}: {}", id, err);
                Err(JsonDbError::new(
                    &format!("Failed to decode document {}: {}", id, err),
                    ErrorKind::EncodingError,
                ))
            }
        }
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, DOC_FILE_EXTENSION))
    }

    fn temp_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, DOC_TEMP_EXTENSION))
    }
}

fn validate_id(id: &str) -> JsonDbResult<()> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
        log::error!("Document id {:?} cannot be used as a file name", id);
        return Err(JsonDbError::new(
            &format!("Document id {:?} cannot be used as a file name", id),
            ErrorKind::InvalidArgument,
        ));
    }
    Ok(())
}
