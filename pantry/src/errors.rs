use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for Pantry operations
///
/// Each kind describes one category of failure so callers can match on it
/// without parsing messages. "Not found" outcomes are not errors in Pantry:
/// lookups return `None` and mutations return `false`.
///
/// # Examples
///
/// ```rust
/// use pantry::errors::{ErrorKind, PantryError, PantryResult};
///
/// fn example() -> PantryResult<()> {
///     Err(PantryError::new("bad id", ErrorKind::InvalidId))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::InvalidId);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // ID errors
    /// The caller supplied an `id` that cannot identify a document
    InvalidId,

    // Operation errors
    /// The operation is not valid in the current context
    InvalidOperation,

    // IO and storage errors
    /// Generic IO error
    IOError,
    /// The file or directory was not found
    FileNotFound,
    /// Permission denied for file operation
    PermissionDenied,

    // Validation errors
    /// Generic validation error (collection names, configuration values)
    ValidationError,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom Pantry error type.
///
/// `PantryError` carries a message, an [ErrorKind], an optional cause and the
/// backtrace captured where it was created.
///
/// ```rust
/// use pantry::errors::{ErrorKind, PantryError};
///
/// let cause = PantryError::new("disk is read-only", ErrorKind::PermissionDenied);
/// let err = PantryError::new_with_cause("Failed to save orders", ErrorKind::IOError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct PantryError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<PantryError>>,
    backtrace: Arc<Backtrace>,
}

impl PantryError {
    /// Creates a new `PantryError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        PantryError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `PantryError` wrapping the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: PantryError) -> Self {
        PantryError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&PantryError> {
        self.cause.as_deref()
    }
}

impl Display for PantryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for PantryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for PantryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for Pantry operations.
pub type PantryResult<T> = Result<T, PantryError>;

impl From<std::io::Error> for PantryError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        PantryError::new(&format!("IO error: {}", err), error_kind)
    }
}
