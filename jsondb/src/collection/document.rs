use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::common::{Value, DOC_ID};
use crate::errors::{ErrorKind, JsonDbError, JsonDbResult};

/// Represents a document stored in a jsondb collection.
///
/// A document is an identifier plus a mapping of field names to [Value]s.
/// The identifier lives outside the content: `_id` is a synthetic field
/// that is resolved from [Document::id] on read and can never be written
/// into the content.
///
/// The serialized form is the persisted layout of the file-backed storage:
///
/// ```json
/// {"_id": "user1", "content": {"name": "Ivan", "age": 30}}
/// ```
///
/// # Examples
///
/// ```rust
/// use jsondb::doc;
///
/// let doc = doc!("user1", { name: "Ivan", age: 30, active: true });
/// assert_eq!(doc.id(), "user1");
/// assert_eq!(doc.size(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    content: BTreeMap<String, Value>,
}

impl Document {
    /// Creates a new empty document with the given identifier.
    ///
    /// The identifier is not validated here; collections reject an empty
    /// identifier on insert and update.
    pub fn new(id: &str) -> Self {
        Document {
            id: id.to_string(),
            content: BTreeMap::new(),
        }
    }

    /// Creates a document from an identifier and already built content.
    ///
    /// # Errors
    ///
    /// Returns [ErrorKind::InvalidArgument] if the content carries `_id`.
    pub fn with_content(id: &str, content: BTreeMap<String, Value>) -> JsonDbResult<Self> {
        if content.contains_key(DOC_ID) {
            log::error!("Document content cannot contain the reserved field {}", DOC_ID);
            return Err(JsonDbError::new(
                &format!("Document content cannot contain the reserved field {}", DOC_ID),
                ErrorKind::InvalidArgument,
            ));
        }
        Ok(Document {
            id: id.to_string(),
            content,
        })
    }

    /// Parses a flat JSON object with a string `_id` into a document.
    ///
    /// The `_id` member is lifted out of the object; every other member
    /// becomes a content field.
    ///
    /// # Errors
    ///
    /// * [ErrorKind::EncodingError] if the text is not valid JSON.
    /// * [ErrorKind::InvalidArgument] if the text is not an object, or `_id`
    ///   is missing, not a string or empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsondb::collection::Document;
    ///
    /// let doc = Document::from_json(r#"{"_id": "user1", "name": "Ivan"}"#).unwrap();
    /// assert_eq!(doc.id(), "user1");
    /// assert!(!doc.contains_key("_id"));
    /// ```
    pub fn from_json(text: &str) -> JsonDbResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                log::error!("Expected a JSON object, found {}", other.type_name());
                return Err(JsonDbError::new(
                    &format!("Expected a JSON object, found {}", other.type_name()),
                    ErrorKind::InvalidArgument,
                ));
            }
        };

        let id = match object.remove(DOC_ID) {
            Some(Value::String(id)) if !id.is_empty() => id,
            _ => {
                log::error!("Document must contain a non-empty string field {}", DOC_ID);
                return Err(JsonDbError::new(
                    &format!("Document must contain a non-empty string field {}", DOC_ID),
                    ErrorKind::InvalidArgument,
                ));
            }
        };

        Ok(Document {
            id,
            content: object,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    pub fn content(&self) -> &BTreeMap<String, Value> {
        &self.content
    }

    /// Associates the specified value with the specified field.
    ///
    /// # Errors
    ///
    /// Returns [ErrorKind::InvalidArgument] if the field is empty or is the
    /// reserved `_id`.
    pub fn put<T: Into<Value>>(&mut self, field: &str, value: T) -> JsonDbResult<()> {
        if field.is_empty() {
            log::error!("Document does not support empty field name");
            return Err(JsonDbError::new(
                "Document does not support empty field name",
                ErrorKind::InvalidArgument,
            ));
        }

        if field == DOC_ID {
            log::error!("Document identifier cannot be set as a content field");
            return Err(JsonDbError::new(
                "Document identifier cannot be set as a content field",
                ErrorKind::InvalidArgument,
            ));
        }

        self.content.insert(field.to_string(), value.into());
        Ok(())
    }

    /// Returns the content value of a field. `_id` is not a content field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.content.get(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.content.remove(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.content.contains_key(field)
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Resolves a field by flat name, `_id` included.
    ///
    /// Dotted names are looked up literally; nested objects are not walked.
    pub fn field_value(&self, field: &str) -> Option<Value> {
        if field == DOC_ID {
            return Some(Value::String(self.id.clone()));
        }
        self.content.get(field).cloned()
    }

    /// Overwrites content fields with the ones from `other`, ignoring `_id`.
    pub fn merge(&mut self, other: BTreeMap<String, Value>) {
        for (field, value) in other {
            if field != DOC_ID {
                self.content.insert(field, value);
            }
        }
    }

    /// Flattens the document into a row with `_id` first, then every content field.
    pub fn to_row(&self) -> IndexMap<String, Value> {
        let mut row = IndexMap::with_capacity(self.content.len() + 1);
        row.insert(DOC_ID.to_string(), Value::String(self.id.clone()));
        for (field, value) in &self.content {
            row.insert(field.clone(), value.clone());
        }
        row
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(&self.to_row()) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{{\"_id\": \"{}\"}}", self.id),
        }
    }
}

/// Strips the quotes `stringify!` leaves around string literal keys.
#[doc(hidden)]
pub fn normalize(key: &str) -> String {
    key.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// # Examples
///
/// ```rust
/// use jsondb::doc;
///
/// let empty = doc!("u0");
/// assert!(empty.is_empty());
///
/// let doc = doc!("u1", {
///     name: "Ivan",
///     "email": "i@x",
///     tags: ["admin", "dev"],
///     address: { city: "Kazan" },
/// });
/// assert_eq!(doc.size(), 4);
/// ```
#[macro_export]
macro_rules! doc {
    ($id:expr) => {
        $crate::collection::Document::new(&$id)
    };

    ($id:expr, { $($key:tt : $value:tt),* $(,)? }) => {
        {
            let mut doc = $crate::collection::Document::new(&$id);
            $(
                doc.put(
                    &$crate::collection::normalize(stringify!($key)),
                    $crate::doc_value!($value),
                )
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Converts a `doc!` value token into a [Value](crate::common::Value).
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            #[allow(unused_mut)]
            let mut object = std::collections::BTreeMap::<String, $crate::common::Value>::new();
            $(
                object.insert(
                    $crate::collection::normalize(stringify!($key)),
                    $crate::doc_value!($value),
                );
            )*
            $crate::common::Value::Object(object)
        }
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
