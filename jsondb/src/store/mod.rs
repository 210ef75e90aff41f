//! Storage backends for collection documents.
//!
//! Every collection owns exactly one [Storage]. The set of backends is closed:
//!
//! - **In-memory** ([InMemoryStorage]): a map from identifier to document, no persistence
//! - **File** ([FileStorage]): one JSON file per document under a directory, with an
//!   optional read cache mirroring disk
//!
//! Both implement the [StorageProvider] capability trait; [Storage] dispatches
//! to the selected variant statically.

mod file;
mod memory;
mod storage;

pub use file::*;
pub use memory::*;
pub use storage::*;
