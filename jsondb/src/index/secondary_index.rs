use std::ops::Bound;

use crate::collection::Document;
use crate::common::Value;
use crate::errors::JsonDbResult;
use crate::index::{BTreeIndex, BTreeStats, IndexOptions};

/// Capability contract of a single-field secondary index.
///
/// Mutating methods take `&mut self`: the owning collection serializes them
/// under its write lock, while lookups run under its read lock.
pub trait IndexProvider: Send + Sync {
    /// Name of the field this index is bound to.
    fn field(&self) -> &str;

    /// Type identifier of the index, e.g. `"btree"`.
    fn index_type(&self) -> &str;

    /// Indexes the current field value of a document.
    ///
    /// Any entry previously recorded for the document's identifier is removed
    /// first. If the field is absent (or not indexable) nothing else happens.
    ///
    /// # Arguments
    /// * `document` - The document in its current state
    fn add(&mut self, document: &Document) -> JsonDbResult<()>;

    /// Removes the entry recorded for an identifier. A no-op if it was never indexed.
    fn remove(&mut self, id: &str) -> JsonDbResult<()>;

    /// Returns the identifiers whose indexed value equals `value`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `field` is not the bound field.
    fn search(&self, field: &str, value: &Value) -> JsonDbResult<Vec<String>>;

    /// Returns the identifiers whose indexed value lies within the bounds,
    /// in ascending value order.
    fn range(&self, lower: Bound<&Value>, upper: Bound<&Value>) -> Vec<String>;

    /// Number of documents currently indexed.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A secondary index owned by a collection.
#[derive(Debug)]
pub enum SecondaryIndex {
    BTree(BTreeIndex),
}

impl SecondaryIndex {
    /// Creates an empty index for `field` as described by `options`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for an unknown index type or an order below 2.
    pub fn new(field: &str, options: &IndexOptions) -> JsonDbResult<SecondaryIndex> {
        options.validate()?;
        Ok(SecondaryIndex::BTree(BTreeIndex::new(field, options.order())))
    }

    /// Shape of the underlying tree.
    pub fn stats(&self) -> BTreeStats {
        match self {
            SecondaryIndex::BTree(index) => index.stats(),
        }
    }
}

impl IndexProvider for SecondaryIndex {
    fn field(&self) -> &str {
        match self {
            SecondaryIndex::BTree(index) => index.field(),
        }
    }

    fn index_type(&self) -> &str {
        match self {
            SecondaryIndex::BTree(index) => index.index_type(),
        }
    }

    fn add(&mut self, document: &Document) -> JsonDbResult<()> {
        match self {
            SecondaryIndex::BTree(index) => index.add(document),
        }
    }

    fn remove(&mut self, id: &str) -> JsonDbResult<()> {
        match self {
            SecondaryIndex::BTree(index) => index.remove(id),
        }
    }

    fn search(&self, field: &str, value: &Value) -> JsonDbResult<Vec<String>> {
        match self {
            SecondaryIndex::BTree(index) => index.search(field, value),
        }
    }

    fn range(&self, lower: Bound<&Value>, upper: Bound<&Value>) -> Vec<String> {
        match self {
            SecondaryIndex::BTree(index) => index.range(lower, upper),
        }
    }

    fn len(&self) -> usize {
        match self {
            SecondaryIndex::BTree(index) => index.len(),
        }
    }
}
