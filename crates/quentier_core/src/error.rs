//! Application error types for core storage and domain logic.
use crate::validation::ValidationError;
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid name: {0}")]
    Validation(#[from] ValidationError),

    #[error("Incompatible storage: found schema version {stored}, this build supports up to {supported}")]
    IncompatibleStorage { stored: u32, supported: u32 },
}

// redb reports each phase with its own error type; all of them fold into
// `redb::Error`.
macro_rules! from_redb {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for AppError {
                fn from(err: $source) -> Self {
                    AppError::Database(err.into())
                }
            }
        )*
    };
}

from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl AppError {
    /// Whether the error is about the caller's input rather than storage.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::BadRequest(_)
                | AppError::Conflict(_)
                | AppError::Validation(_)
        )
    }
}
