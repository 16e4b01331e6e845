//! Card adaptation protocol.
//!
//! At a pass boundary the session hands its deck and performance log to a
//! [`DeckAdapter`], which returns the same cards reordered so that the cards
//! missed most often come first. The session never trusts the adapter with
//! the deck size: [`validate_adapted`] rejects any response that adds or
//! drops cards.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::types::{Deck, PerformanceEntry};

/// Deck plus the performance log of the pass that just ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationRequest {
    pub flashcards: Deck,
    #[serde(default)]
    pub user_performance: Vec<PerformanceEntry>,
}

impl AdaptationRequest {
    /// Number of incorrect answers recorded per deck position.
    /// Entries pointing outside the deck are ignored.
    pub fn miss_counts(&self) -> Vec<usize> {
        let mut misses = vec![0; self.flashcards.len()];
        for entry in &self.user_performance {
            if entry.correct {
                continue;
            }
            if let Some(count) = misses.get_mut(entry.flashcard_index) {
                *count += 1;
            }
        }
        misses
    }
}

/// Trait for services that reorder a deck based on performance.
///
/// With an empty performance log an adapter must return the deck unchanged.
#[async_trait]
pub trait DeckAdapter: Send + Sync {
    /// Adapter identifier.
    fn name(&self) -> &'static str;

    /// Reorder the request's deck.
    async fn adapt(&self, request: &AdaptationRequest) -> Result<Deck, ServiceError>;
}

/// Accept an adapted deck only if it has as many cards as the request.
pub fn validate_adapted(request: &AdaptationRequest, adapted: Deck) -> Result<Deck, ServiceError> {
    ensure_cardinality(request.flashcards.len(), adapted)
}

pub(crate) fn ensure_cardinality(expected: usize, adapted: Deck) -> Result<Deck, ServiceError> {
    if adapted.len() != expected {
        return Err(ServiceError::CardinalityMismatch {
            expected,
            actual: adapted.len(),
        });
    }
    Ok(adapted)
}

/// Deterministic adapter: most-missed cards first, ties keep their previous order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceReorder;

impl PerformanceReorder {
    pub fn reorder(&self, request: &AdaptationRequest) -> Deck {
        let misses = request.miss_counts();
        let mut order: Vec<usize> = (0..request.flashcards.len()).collect();
        // sort_by_key is stable
        order.sort_by_key(|&idx| std::cmp::Reverse(misses[idx]));
        order
            .into_iter()
            .map(|idx| request.flashcards[idx].clone())
            .collect()
    }
}

#[async_trait]
impl DeckAdapter for PerformanceReorder {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn adapt(&self, request: &AdaptationRequest) -> Result<Deck, ServiceError> {
        Ok(self.reorder(request))
    }
}
