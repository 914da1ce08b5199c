//! Error types for the file context server
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::access::AccessError;

// == Server Error Enum ==
/// Unified error type for tool operations.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Path could not be resolved, or is the wrong kind of entry
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Blocked by the access guard
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// File or directory does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// File exceeds the requested size limit
    #[error("file too large: {0}")]
    FileTooLarge(String),

    /// The OS refused the operation
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Path exists with an incompatible type
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Directory has entries and recursive deletion was not requested
    #[error("directory not empty: {0}")]
    NotEmpty(String),

    /// Regex or glob failed to compile
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// Tool arguments are missing or malformed
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Any other I/O failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::InvalidPath(_) => "INVALID_PATH",
            ServerError::AccessDenied(_) => "ACCESS_DENIED",
            ServerError::NotFound(_) => "FILE_NOT_FOUND",
            ServerError::FileTooLarge(_) => "FILE_TOO_LARGE",
            ServerError::PermissionDenied(_) => "PERMISSION_DENIED",
            ServerError::AlreadyExists(_) => "ALREADY_EXISTS",
            ServerError::NotEmpty(_) => "NOT_EMPTY",
            ServerError::InvalidPattern(_) => "INVALID_PATTERN",
            ServerError::InvalidArguments(_) => "INVALID_ARGUMENTS",
            ServerError::Io(_) => "IO_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Classifies an I/O error raised while operating on `path`.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let shown = path.display();
        match err.kind() {
            io::ErrorKind::NotFound => ServerError::NotFound(shown.to_string()),
            io::ErrorKind::PermissionDenied => ServerError::PermissionDenied(shown.to_string()),
            io::ErrorKind::AlreadyExists => ServerError::AlreadyExists(shown.to_string()),
            _ => ServerError::Io(format!("{} ({})", err, shown)),
        }
    }
}

impl From<AccessError> for ServerError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::InvalidPath { .. } => ServerError::InvalidPath(err.to_string()),
            AccessError::Blocked { .. } | AccessError::OutsideRoots { .. } => {
                ServerError::AccessDenied(err.to_string())
            }
            AccessError::BadPattern { .. } => ServerError::InvalidPattern(err.to_string()),
        }
    }
}

impl From<regex::Error> for ServerError {
    fn from(err: regex::Error) -> Self {
        ServerError::InvalidPattern(err.to_string())
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for tool operations.
pub type Result<T> = std::result::Result<T, ServerError>;
