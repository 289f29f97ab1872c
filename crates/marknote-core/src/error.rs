//! Error types for marknote.

use thiserror::Error;

/// Result type alias using marknote's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for marknote operations.
///
/// Not-found variants deliberately merge "does not exist" and "owned by
/// someone else": owner-scoped queries cannot tell the two apart, and the
/// HTTP layer must not leak existence of other users' rows.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document not found (or not owned by the caller)
    #[error("Document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    /// Tag not found (or not owned by the caller)
    #[error("Tag not found: {0}")]
    TagNotFound(uuid::Uuid),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(uuid::Uuid),

    /// Uniqueness constraint violated (tag name, username, email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Cross-user linkage attempted (e.g. attaching another user's tag)
    #[error("Ownership mismatch: {0}")]
    OwnershipMismatch(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Document conversion failed
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error should surface to callers as "not found".
    ///
    /// `OwnershipMismatch` is included: the HTTP layer maps it to 404 so
    /// that probing another user's tag ids is indistinguishable from
    /// probing ids that were never issued.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::DocumentNotFound(_)
                | Error::TagNotFound(_)
                | Error::UserNotFound(_)
                | Error::OwnershipMismatch(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
