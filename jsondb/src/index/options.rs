use crate::common::{BTREE_INDEX, DEFAULT_BTREE_ORDER, MIN_BTREE_ORDER};
use crate::errors::{ErrorKind, JsonDbError, JsonDbResult};

/// Specifies configuration options for creating a secondary index.
///
/// # Index Types
/// - **btree**: an ordered B-tree keyed on a single field. The `order` is the
///   maximum number of keys a node holds before it splits.
///
/// # Usage
///
/// IndexOptions is passed to `Collection::create_index`:
/// ```rust
/// use jsondb::index::{btree_index, IndexOptions};
///
/// let opts = btree_index(8);
/// assert_eq!(opts.index_type(), "btree");
/// assert_eq!(opts.order(), 8);
///
/// let default_opts = IndexOptions::default();
/// assert_eq!(default_opts.order(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexOptions {
    index_type: String,
    order: usize,
}

impl IndexOptions {
    /// Creates new options; no validation happens until the index is built.
    pub fn new(index_type: &str, order: usize) -> IndexOptions {
        IndexOptions {
            index_type: index_type.to_string(),
            order,
        }
    }

    pub fn index_type(&self) -> String {
        self.index_type.clone()
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Checks that the index type is known and the order is usable.
    pub(crate) fn validate(&self) -> JsonDbResult<()> {
        if !self.index_type.eq_ignore_ascii_case(BTREE_INDEX) {
            log::error!("Unknown index type {}", self.index_type);
            return Err(JsonDbError::new(
                &format!("Unknown index type {}", self.index_type),
                ErrorKind::InvalidArgument,
            ));
        }

        if self.order < MIN_BTREE_ORDER {
            log::error!(
                "B-tree order must be at least {}, got {}",
                MIN_BTREE_ORDER,
                self.order
            );
            return Err(JsonDbError::new(
                &format!(
                    "B-tree order must be at least {}, got {}",
                    MIN_BTREE_ORDER, self.order
                ),
                ErrorKind::InvalidArgument,
            ));
        }
        Ok(())
    }
}

impl Default for IndexOptions {
    fn default() -> Self {
        btree_index(DEFAULT_BTREE_ORDER)
    }
}

/// Creates options for a B-tree index of the given order.
#[inline]
pub fn btree_index(order: usize) -> IndexOptions {
    IndexOptions::new(BTREE_INDEX, order)
}
