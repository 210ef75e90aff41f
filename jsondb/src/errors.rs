use backtrace::Backtrace;
use serde::{de, ser};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

use parking_lot::Mutex;

/// Error kinds for jsondb operations.
///
/// Every failure surfaced by a collection, index, storage backend or the
/// query engine carries exactly one of these kinds, so callers can branch on
/// the category without parsing the message.
///
/// # Examples
///
/// ```rust
/// use jsondb::errors::{ErrorKind, JsonDbError, JsonDbResult};
///
/// fn lookup() -> JsonDbResult<()> {
///     Err(JsonDbError::new("collection users not found", ErrorKind::NotFound))
/// }
///
/// assert_eq!(lookup().unwrap_err().kind(), &ErrorKind::NotFound);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// Unknown collection, document or index field
    NotFound,
    /// Duplicate collection name or duplicate index field
    AlreadyExists,
    /// Empty identifier, malformed query text or literal, unknown index type
    InvalidArgument,
    /// Backend read, write or delete failure
    IOError,
    /// A persisted document could not be serialized or deserialized
    EncodingError,
    /// The operation is not valid in the current state (e.g. dropped collection)
    InvalidOperation,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::AlreadyExists => write!(f, "Already exists"),
            ErrorKind::InvalidArgument => write!(f, "Invalid argument"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom jsondb error type.
///
/// `JsonDbError` carries a message, an [ErrorKind], an optional cause and an
/// unresolved backtrace that is only symbolized when the error is printed
/// with `{:?}`.
///
/// # Examples
///
/// ```rust
/// use jsondb::errors::{ErrorKind, JsonDbError};
///
/// let cause = JsonDbError::new("disk unplugged", ErrorKind::IOError);
/// let err = JsonDbError::new_with_cause("save failed", ErrorKind::IOError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct JsonDbError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<JsonDbError>>,
    backtrace: Arc<Mutex<Backtrace>>,
}

impl JsonDbError {
    /// Creates a new `JsonDbError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        JsonDbError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Mutex::new(Backtrace::new_unresolved())),
        }
    }

    /// Creates a new `JsonDbError` wrapping an underlying cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: JsonDbError) -> Self {
        JsonDbError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Mutex::new(Backtrace::new_unresolved())),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&JsonDbError> {
        self.cause.as_deref()
    }
}

impl Display for JsonDbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for JsonDbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => {
                let mut backtrace = self.backtrace.lock();
                backtrace.resolve();
                write!(f, "{}\n{:?}", self.message, *backtrace)
            }
        }
    }
}

impl Error for JsonDbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for jsondb operations.
pub type JsonDbResult<T> = Result<T, JsonDbError>;

impl de::Error for JsonDbError {
    fn custom<T: Display>(msg: T) -> Self {
        JsonDbError::new(&msg.to_string(), ErrorKind::EncodingError)
    }
}

impl ser::Error for JsonDbError {
    fn custom<T: Display>(msg: T) -> Self {
        JsonDbError::new(&msg.to_string(), ErrorKind::EncodingError)
    }
}

impl From<std::io::Error> for JsonDbError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::IOError,
        };
        JsonDbError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<serde_json::Error> for JsonDbError {
    fn from(err: serde_json::Error) -> Self {
        JsonDbError::new(&format!("JSON error: {}", err), ErrorKind::EncodingError)
    }
}

impl From<std::num::ParseIntError> for JsonDbError {
    fn from(err: std::num::ParseIntError) -> Self {
        JsonDbError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidArgument,
        )
    }
}

impl From<std::num::ParseFloatError> for JsonDbError {
    fn from(err: std::num::ParseFloatError) -> Self {
        JsonDbError::new(
            &format!("Float parsing error: {}", err),
            ErrorKind::InvalidArgument,
        )
    }
}

impl From<chrono::ParseError> for JsonDbError {
    fn from(err: chrono::ParseError) -> Self {
        JsonDbError::new(
            &format!("Date parsing error: {}", err),
            ErrorKind::InvalidArgument,
        )
    }
}
