//! # jsondb - Embeddable JSON Document Store
//!
//! jsondb keeps named collections of JSON documents behind a pluggable
//! storage backend, maintains B-tree secondary indexes on document fields
//! and answers a small SQL-like query language.
//!
//! ## Key Features
//!
//! - **Embedded**: a library, no server process
//! - **Storage backends**: in-memory, or one JSON file per document with an optional read cache
//! - **Indexing**: per-field B-tree indexes with exact-match and range lookups
//! - **Queries**: `SELECT ... FROM ... WHERE ... LIMIT ... OFFSET ...`
//! - **Functions**: string, number and date helpers over document values
//!
//! ## Quick Start
//!
//! ```rust
//! use jsondb::database::Database;
//! use jsondb::doc;
//! use jsondb::index::btree_index;
//! use jsondb::store::Storage;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new();
//! let users = db.create_collection("users", Storage::memory())?;
//!
//! users.insert(&doc!("u1", { name: "Ivan", age: 30, active: true }))?;
//! users.insert(&doc!("u2", { name: "Mara", age: 22, active: true }))?;
//! users.create_index("age", &btree_index(5))?;
//!
//! let rows = db.query("SELECT name FROM users WHERE age >= 25 AND active = true")?;
//! assert_eq!(rows.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents and collections
//! - [`common`] - Field values, constants and shared utilities
//! - [`config`] - Database configuration and storage factory
//! - [`database`] - The collection registry and query entry point
//! - [`errors`] - Error types and result definitions
//! - [`functions`] - String, number and date function library
//! - [`index`] - B-tree and secondary index support
//! - [`query`] - Query parsing and execution
//! - [`store`] - Storage backend abstractions

pub mod collection;
pub mod common;
pub mod config;
pub mod database;
pub mod errors;
pub mod functions;
pub mod index;
pub mod query;
pub mod store;
