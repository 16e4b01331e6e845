//! Database error types.

use flashgenius_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid data in set {id}: {message}")]
    InvalidData { id: String, message: String },

    #[error("database lock poisoned")]
    Poisoned,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::InvalidData { id, message } => StoreError::Corrupt { id, message },
            other => StoreError::Backend(other.to_string()),
        }
    }
}
