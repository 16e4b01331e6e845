//! SQLite schema definitions.

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Flashcard sets are stored whole: the deck is a JSON array column.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS flashcard_sets (
    profile TEXT NOT NULL,
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    flashcards TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (profile, id)
);

CREATE INDEX IF NOT EXISTS idx_flashcard_sets_created
    ON flashcard_sets (profile, created_at DESC);
"#;
