//! Error types for flashgenius-core.

use thiserror::Error;

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Input rejected before any state change or remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("topic is required")]
    BlankTopic,

    #[error("set name is required")]
    BlankSetName,

    #[error("unsupported document type: {0}")]
    UnsupportedMediaType(String),

    #[error("unreadable document: {0}")]
    UnreadableDocument(String),

    #[error("document exceeds the {max_bytes}-byte upload limit")]
    DocumentTooLarge { max_bytes: usize },
}

/// Failures of the generation or adaptation collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("model request failed: {0}")]
    Remote(String),

    #[error("model returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("adapted deck has {actual} cards, expected {expected}")]
    CardinalityMismatch { expected: usize, actual: usize },
}

/// Flashcard store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("corrupt stored set {id}: {message}")]
    Corrupt { id: String, message: String },
}

/// Errors returned by study session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session is busy adapting flashcards")]
    Busy,

    #[error("no adaptation is pending")]
    NoAdaptationPending,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
