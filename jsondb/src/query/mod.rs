//! The query language: parsing query text and executing it.
//!
//! ```text
//! SELECT name, email FROM users WHERE age >= 25 AND active = true LIMIT 10 OFFSET 20
//! ```
//!
//! [parse_query] turns text into a [Query]; [execute_query] scans the source
//! collection, filters by the condition tree, projects, then applies offset
//! and limit. Queries are normally run through
//! [Database::query](crate::database::Database::query).

mod executor;
mod model;
mod parser;

pub use executor::*;
pub use model::*;
pub use parser::*;
