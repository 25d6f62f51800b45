/// Core error types for the favorites collection
use thiserror::Error;

/// Result type alias using `FavoritesError`
pub type Result<T> = std::result::Result<T, FavoritesError>;

/// Core error type for the favorites collection
///
/// Addressing a favorite that does not exist is not an error: store
/// operations report it through `Option`/`bool` return values instead.
#[derive(Error, Debug)]
pub enum FavoritesError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Two favorites ended up sharing a rank
    ///
    /// The rank-shift algorithm never produces this; seeing it means the
    /// store has a bug, not that the caller sent bad input.
    #[error("Rank constraint violated: {0}")]
    ConstraintViolation(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Legacy import errors
    #[error("Import error: {0}")]
    Import(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FavoritesError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an import error
    pub fn import(msg: impl Into<String>) -> Self {
        Self::Import(msg.into())
    }

    /// Whether this error signals a broken rank invariant
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for FavoritesError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::ConstraintViolation(db_err.message().to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}
