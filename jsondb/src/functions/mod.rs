//! Stateless helper functions over strings, numbers and dates.
//!
//! The query language does not call these; they are exposed to host code
//! through [FunctionRegistry], usually obtained from
//! [Database::functions](crate::database::Database::functions).

mod date;
mod number;
mod registry;
mod string;

pub use date::*;
pub use number::*;
pub use registry::*;
pub use string::*;
