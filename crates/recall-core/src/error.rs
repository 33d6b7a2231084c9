//! Error types for history storage operations.

use thiserror::Error;

/// A shared error type for history storage operations.
///
/// Backing stores produce these; the filtering layer propagates them to the
/// caller without translation. Classification and mode switching have no
/// error path.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing store error for stores that are not filesystem-shaped
    #[error("History store error: {0}")]
    Store(String),
}

impl HistoryError {
    /// Creates a Store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// A type alias for `Result<T, HistoryError>`.
pub type Result<T> = std::result::Result<T, HistoryError>;
