//! Repository for flashcard set rows.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use flashgenius_core::{Deck, FlashcardSet, FlashcardStore, StoreError};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::error::DbError;

type Result<T> = std::result::Result<T, DbError>;

/// SQLite database shared by all profiles.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open database at path, creating it and its parent directory if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::initialize(Connection::open(path)?)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(super::schema::SCHEMA)?;
        conn.pragma_update(None, "user_version", super::schema::SCHEMA_VERSION)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    /// Store scoped to a profile. `None` means no profile context.
    pub fn for_profile<'a>(&'a self, profile: Option<&'a str>) -> Option<ProfileStore<'a>> {
        profile.map(|profile| ProfileStore { db: self, profile })
    }

    pub fn list_sets(&self, profile: &str) -> Result<Vec<FlashcardSet>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, flashcards, created_at FROM flashcard_sets WHERE profile = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![profile], Self::row_to_raw)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(RawSet::into_set).collect()
    }

    pub fn get_set(&self, profile: &str, id: &str) -> Result<Option<FlashcardSet>> {
        let conn = self.conn()?;
        let raw = conn
            .query_row(
                "SELECT id, name, flashcards, created_at FROM flashcard_sets WHERE profile = ?1 AND id = ?2",
                params![profile, id],
                Self::row_to_raw,
            )
            .optional()?;
        raw.map(RawSet::into_set).transpose()
    }

    /// Insert or replace by (profile, id).
    pub fn save_set(&self, profile: &str, set: &FlashcardSet) -> Result<()> {
        let flashcards = serde_json::to_string(&set.flashcards).map_err(|e| DbError::InvalidData {
            id: set.id.clone(),
            message: e.to_string(),
        })?;
        self.conn()?.execute(
            "INSERT INTO flashcard_sets (profile, id, name, flashcards, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (profile, id) DO UPDATE SET
                name = excluded.name,
                flashcards = excluded.flashcards,
                created_at = excluded.created_at",
            params![profile, set.id, set.name, flashcards, set.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Returns whether a row was removed.
    pub fn delete_set(&self, profile: &str, id: &str) -> Result<bool> {
        let count = self.conn()?.execute(
            "DELETE FROM flashcard_sets WHERE profile = ?1 AND id = ?2",
            params![profile, id],
        )?;
        Ok(count > 0)
    }

    fn row_to_raw(row: &rusqlite::Row) -> rusqlite::Result<RawSet> {
        Ok(RawSet {
            id: row.get(0)?,
            name: row.get(1)?,
            flashcards: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

struct RawSet {
    id: String,
    name: String,
    flashcards: String,
    created_at: String,
}

impl RawSet {
    fn into_set(self) -> Result<FlashcardSet> {
        let flashcards: Deck =
            serde_json::from_str(&self.flashcards).map_err(|e| DbError::InvalidData {
                id: self.id.clone(),
                message: e.to_string(),
            })?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DbError::InvalidData {
                id: self.id.clone(),
                message: e.to_string(),
            })?;

        Ok(FlashcardSet {
            id: self.id,
            name: self.name,
            flashcards,
            created_at,
        })
    }
}

/// [`FlashcardStore`] view of one profile's sets.
#[derive(Clone, Copy)]
pub struct ProfileStore<'a> {
    db: &'a Database,
    profile: &'a str,
}

impl ProfileStore<'_> {
    pub fn profile(&self) -> &str {
        self.profile
    }
}

impl FlashcardStore for ProfileStore<'_> {
    fn list_all(&self) -> std::result::Result<Vec<FlashcardSet>, StoreError> {
        Ok(self.db.list_sets(self.profile)?)
    }

    fn get_by_id(&self, id: &str) -> std::result::Result<Option<FlashcardSet>, StoreError> {
        Ok(self.db.get_set(self.profile, id)?)
    }

    fn save(&self, set: &FlashcardSet) -> std::result::Result<(), StoreError> {
        Ok(self.db.save_set(self.profile, set)?)
    }

    fn delete(&self, id: &str) -> std::result::Result<(), StoreError> {
        self.db.delete_set(self.profile, id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashgenius_core::{newest_first, Flashcard};
    use pretty_assertions::assert_eq;

    fn set(id: &str, name: &str) -> FlashcardSet {
        FlashcardSet {
            id: id.to_string(),
            name: name.to_string(),
            flashcards: vec![
                Flashcard::new("Capital of France?", "Paris"),
                Flashcard::new("Highest mountain?", "Everest"),
            ],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_and_get_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let original = set("abc123xyz", "Geography");
        db.save_set("alice", &original).unwrap();

        let loaded = db.get_set("alice", "abc123xyz").unwrap().unwrap();
        assert_eq!(loaded.name, "Geography");
        assert_eq!(loaded.flashcards, original.flashcards);
        assert_eq!(loaded.created_at.timestamp(), original.created_at.timestamp());
    }

    #[test]
    fn test_save_replaces_whole_record() {
        let db = Database::open_in_memory().unwrap();
        db.save_set("alice", &set("a1", "First")).unwrap();

        let mut updated = set("a1", "Renamed");
        updated.flashcards.truncate(1);
        db.save_set("alice", &updated).unwrap();

        let all = db.list_sets("alice").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Renamed");
        assert_eq!(all[0].flashcards.len(), 1);
    }

    #[test]
    fn test_profiles_are_isolated() {
        let db = Database::open_in_memory().unwrap();
        db.save_set("alice", &set("a1", "Alice's")).unwrap();
        db.save_set("bob", &set("a1", "Bob's")).unwrap();

        assert_eq!(db.get_set("alice", "a1").unwrap().unwrap().name, "Alice's");
        assert_eq!(db.get_set("bob", "a1").unwrap().unwrap().name, "Bob's");
        assert!(db.list_sets("carol").unwrap().is_empty());
    }

    #[test]
    fn test_delete_reports_removal() {
        let db = Database::open_in_memory().unwrap();
        db.save_set("alice", &set("a1", "First")).unwrap();
        assert!(db.delete_set("alice", "a1").unwrap());
        assert!(!db.delete_set("alice", "a1").unwrap());
        assert_eq!(db.get_set("alice", "a1").unwrap(), None);
    }

    #[test]
    fn test_corrupt_row_is_reported() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .unwrap()
            .execute(
                "INSERT INTO flashcard_sets (profile, id, name, flashcards, created_at) VALUES ('alice', 'bad', 'Bad', 'not json', '2024-01-01T00:00:00Z')",
                [],
            )
            .unwrap();

        let err: StoreError = db.get_set("alice", "bad").unwrap_err().into();
        assert!(matches!(err, StoreError::Corrupt { ref id, .. } if id == "bad"));
    }

    #[test]
    fn test_profile_store_implements_contract() {
        let db = Database::open_in_memory().unwrap();
        let store = db.for_profile(Some("alice"));

        store.save(&set("a1", "First")).unwrap();
        let mut older = set("a0", "Older");
        older.created_at = Utc::now() - chrono::Duration::days(1);
        store.save(&older).unwrap();

        let ids: Vec<String> = newest_first(store.list_all().unwrap())
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["a1", "a0"]);

        store.delete("a1").unwrap();
        assert_eq!(store.get_by_id("a1").unwrap(), None);
    }

    #[test]
    fn test_missing_profile_context_drops_writes() {
        let db = Database::open_in_memory().unwrap();
        let store = db.for_profile(None);

        store.save(&set("a1", "First")).unwrap();
        assert!(store.list_all().unwrap().is_empty());
        assert!(db.list_sets("").unwrap().is_empty());
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = std::env::temp_dir().join(format!("flashgenius-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("flashgenius.db");

        let db = Database::open(&path).unwrap();
        db.save_set("alice", &set("a1", "First")).unwrap();
        assert!(path.exists());

        drop(db);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
