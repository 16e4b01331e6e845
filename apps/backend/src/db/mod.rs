//! Local SQLite storage for flashcard sets.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{Database, ProfileStore};
