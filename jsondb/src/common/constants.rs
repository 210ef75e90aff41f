/// Name of the synthetic identifier field; never stored inside document content.
pub const DOC_ID: &str = "_id";

/// Suffix of every document file written by the file-backed storage.
pub const DOC_FILE_EXTENSION: &str = "json";

/// Suffix of the scratch file a document is written to before it is renamed into place.
pub const DOC_TEMP_EXTENSION: &str = "json.tmp";

/// The only index type currently known.
pub const BTREE_INDEX: &str = "btree";

/// Default maximum number of keys per B-tree node.
pub const DEFAULT_BTREE_ORDER: usize = 5;

/// Smallest order for which node splitting keeps both halves non-empty.
pub const MIN_BTREE_ORDER: usize = 2;
