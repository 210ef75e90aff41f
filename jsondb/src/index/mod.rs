//! Secondary indexes over a single document field.
//!
//! A collection keeps at most one index per field. Each index maps the
//! field's value to the identifiers of the documents currently holding it,
//! and keeps a reverse map from identifier to indexed value so a document
//! can be removed without knowing its old content.
//!
//! The only index type is an ordered B-tree ([BTreeIndex]); [SecondaryIndex]
//! is the closed set of index variants a collection can own.

mod btree;
mod btree_index;
mod options;
mod secondary_index;

pub use btree::*;
pub use btree_index::*;
pub use options::*;
pub use secondary_index::*;
