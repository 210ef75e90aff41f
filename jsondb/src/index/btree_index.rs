use std::collections::HashMap;
use std::ops::Bound;

use crate::collection::Document;
use crate::common::{Value, BTREE_INDEX};
use crate::errors::{ErrorKind, JsonDbError, JsonDbResult};
use crate::index::{is_indexable, BTree, BTreeStats, IndexProvider};

/// An ordered index on one field, backed by a [BTree].
///
/// Each key is a distinct field value and carries the identifiers of the
/// documents holding it, in insertion order and without duplicates. The
/// reverse map records, for every indexed identifier, the value it is
/// filed under.
#[derive(Debug)]
pub struct BTreeIndex {
    field: String,
    tree: BTree<Vec<String>>,
    reverse: HashMap<String, Value>,
}

impl BTreeIndex {
    pub fn new(field: &str, order: usize) -> BTreeIndex {
        BTreeIndex {
            field: field.to_string(),
            tree: BTree::new(order),
            reverse: HashMap::new(),
        }
    }

    pub fn order(&self) -> usize {
        self.tree.order()
    }

    /// Number of distinct values in the index.
    pub fn key_count(&self) -> usize {
        self.tree.len()
    }

    pub fn stats(&self) -> BTreeStats {
        self.tree.stats()
    }

    /// The value an identifier is currently filed under.
    pub fn indexed_value(&self, id: &str) -> Option<&Value> {
        self.reverse.get(id)
    }
}

impl IndexProvider for BTreeIndex {
    fn field(&self) -> &str {
        &self.field
    }

    fn index_type(&self) -> &str {
        BTREE_INDEX
    }

    fn add(&mut self, document: &Document) -> JsonDbResult<()> {
        let id = document.id();
        self.remove(id)?;

        let value = match document.field_value(&self.field) {
            Some(value) if is_indexable(&value) => value,
            _ => return Ok(()),
        };

        let mut ids = self.tree.get(&value).cloned().unwrap_or_default();
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
        self.tree.upsert(value.clone(), ids);
        self.reverse.insert(id.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> JsonDbResult<()> {
        let value = match self.reverse.remove(id) {
            Some(value) => value,
            None => return Ok(()),
        };

        let mut ids = match self.tree.get(&value) {
            Some(ids) => ids.clone(),
            None => {
                log::error!(
                    "Index on {} has no entry for value {} recorded for {}",
                    self.field,
                    value,
                    id
                );
                return Err(JsonDbError::new(
                    &format!(
                        "Index on {} has no entry for value {} recorded for {}",
                        self.field, value, id
                    ),
                    ErrorKind::InternalError,
                ));
            }
        };

        ids.retain(|existing| existing != id);
        if ids.is_empty() {
            self.tree.delete(&value);
        } else {
            self.tree.upsert(value, ids);
        }
        Ok(())
    }

    fn search(&self, field: &str, value: &Value) -> JsonDbResult<Vec<String>> {
        if field != self.field {
            log::error!("Index is on field {}, not {}", self.field, field);
            return Err(JsonDbError::new(
                &format!("Index is on field {}, not {}", self.field, field),
                ErrorKind::InvalidArgument,
            ));
        }

        if !is_indexable(value) {
            return Ok(Vec::new());
        }
        Ok(self.tree.get(value).cloned().unwrap_or_default())
    }

    fn range(&self, lower: Bound<&Value>, upper: Bound<&Value>) -> Vec<String> {
        self.tree
            .range(lower, upper)
            .into_iter()
            .flat_map(|(_, ids)| ids.iter().cloned())
            .collect()
    }

    fn len(&self) -> usize {
        self.reverse.len()
    }
}
