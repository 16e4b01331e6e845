//! Flashcard set persistence contract.

use std::sync::RwLock;

use crate::error::StoreError;
use crate::types::FlashcardSet;

/// Whole-record store of flashcard sets keyed by set id.
///
/// Writes replace the full record; the last writer wins.
pub trait FlashcardStore {
    fn list_all(&self) -> Result<Vec<FlashcardSet>, StoreError>;
    fn get_by_id(&self, id: &str) -> Result<Option<FlashcardSet>, StoreError>;
    /// Insert, or replace the set with the same id.
    fn save(&self, set: &FlashcardSet) -> Result<(), StoreError>;
    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Whether writes reach a backing store.
    fn is_attached(&self) -> bool {
        true
    }
}

impl<S: FlashcardStore + ?Sized> FlashcardStore for &S {
    fn list_all(&self) -> Result<Vec<FlashcardSet>, StoreError> {
        (**self).list_all()
    }

    fn get_by_id(&self, id: &str) -> Result<Option<FlashcardSet>, StoreError> {
        (**self).get_by_id(id)
    }

    fn save(&self, set: &FlashcardSet) -> Result<(), StoreError> {
        (**self).save(set)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }
}

/// `None` stands for "no profile context": reads come back empty and writes
/// are dropped instead of failing.
impl<S: FlashcardStore> FlashcardStore for Option<S> {
    fn list_all(&self) -> Result<Vec<FlashcardSet>, StoreError> {
        match self {
            Some(store) => store.list_all(),
            None => Ok(Vec::new()),
        }
    }

    fn get_by_id(&self, id: &str) -> Result<Option<FlashcardSet>, StoreError> {
        match self {
            Some(store) => store.get_by_id(id),
            None => Ok(None),
        }
    }

    fn save(&self, set: &FlashcardSet) -> Result<(), StoreError> {
        match self {
            Some(store) => store.save(set),
            None => Ok(()),
        }
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        match self {
            Some(store) => store.delete(id),
            None => Ok(()),
        }
    }

    fn is_attached(&self) -> bool {
        self.as_ref().is_some_and(|store| store.is_attached())
    }
}

/// In-memory store keeping insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sets: RwLock<Vec<FlashcardSet>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("memory store lock poisoned".to_string())
    }
}

impl FlashcardStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<FlashcardSet>, StoreError> {
        Ok(self.sets.read().map_err(|_| Self::poisoned())?.clone())
    }

    fn get_by_id(&self, id: &str) -> Result<Option<FlashcardSet>, StoreError> {
        let sets = self.sets.read().map_err(|_| Self::poisoned())?;
        Ok(sets.iter().find(|s| s.id == id).cloned())
    }

    fn save(&self, set: &FlashcardSet) -> Result<(), StoreError> {
        let mut sets = self.sets.write().map_err(|_| Self::poisoned())?;
        match sets.iter_mut().find(|s| s.id == set.id) {
            Some(existing) => *existing = set.clone(),
            None => sets.push(set.clone()),
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.sets
            .write()
            .map_err(|_| Self::poisoned())?
            .retain(|s| s.id != id);
        Ok(())
    }
}

/// Sort sets for listing, most recently created first.
pub fn newest_first(mut sets: Vec<FlashcardSet>) -> Vec<FlashcardSet> {
    sets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sets
}
