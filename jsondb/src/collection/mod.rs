//! Collections and documents.
//!
//! A [Document] is an identifier plus a map of field names to
//! [Value](crate::common::Value)s. A [Collection] owns one
//! [Storage](crate::store::Storage) backend and at most one secondary index
//! per field, and keeps every index consistent with every successful
//! mutation.
//!
//! ```rust
//! use jsondb::collection::Collection;
//! use jsondb::common::Value;
//! use jsondb::doc;
//! use jsondb::index::btree_index;
//! use jsondb::store::Storage;
//!
//! let users = Collection::new("users", Storage::memory());
//! users.insert(&doc!("u1", { name: "Ivan", age: 30 })).unwrap();
//! users.create_index("age", &btree_index(5)).unwrap();
//!
//! let found = users.find_by_index("age", &Value::Integer(30)).unwrap();
//! assert_eq!(found[0].id(), "u1");
//! ```

mod document_collection;
mod document;

pub use document_collection::*;
pub use document::*;
