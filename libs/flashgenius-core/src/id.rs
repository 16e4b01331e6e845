//! Flashcard set identifiers.

use uuid::Uuid;

use crate::error::StoreError;
use crate::store::FlashcardStore;

const ID_LEN: usize = 9;
const MAX_ATTEMPTS: usize = 8;
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Mint a short base-36 set id that the store does not already hold.
///
/// After a handful of collisions falls back to a full simple UUID.
pub fn mint_set_id<S: FlashcardStore + ?Sized>(store: &S) -> Result<String, StoreError> {
    for _ in 0..MAX_ATTEMPTS {
        let candidate = short_id(Uuid::new_v4());
        if store.get_by_id(&candidate)?.is_none() {
            return Ok(candidate);
        }
        tracing::debug!(id = %candidate, "set id collision, drawing again");
    }
    Ok(Uuid::new_v4().simple().to_string())
}

fn short_id(uuid: Uuid) -> String {
    let mut bits = uuid.as_u128();
    let mut id = String::with_capacity(ID_LEN);
    for _ in 0..ID_LEN {
        id.push(ALPHABET[(bits % 36) as usize] as char);
        bits /= 36;
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::FlashcardSet;
    use chrono::Utc;
    use std::collections::HashSet;

    /// Store that claims every short id is taken.
    struct Crowded;

    impl FlashcardStore for Crowded {
        fn list_all(&self) -> Result<Vec<FlashcardSet>, StoreError> {
            Ok(vec![])
        }

        fn get_by_id(&self, id: &str) -> Result<Option<FlashcardSet>, StoreError> {
            Ok(Some(FlashcardSet {
                id: id.to_string(),
                name: "taken".to_string(),
                flashcards: vec![],
                created_at: Utc::now(),
            }))
        }

        fn save(&self, _set: &FlashcardSet) -> Result<(), StoreError> {
            Ok(())
        }

        fn delete(&self, _id: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn ids_are_short_base36() {
        let id = mint_set_id(&MemoryStore::new()).unwrap();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn ids_do_not_repeat() {
        let store = MemoryStore::new();
        let ids: HashSet<String> = (0..200).map(|_| mint_set_id(&store).unwrap()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn falls_back_to_uuid_when_crowded() {
        let id = mint_set_id(&Crowded).unwrap();
        assert_eq!(id.len(), 32);
    }
}
