//! Core types for the flashcard application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A question/answer pair. Cards have no identity beyond their position in a deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Ordered sequence of flashcards in presentation order.
pub type Deck = Vec<Flashcard>;

/// One recorded answer. The index is positional within the deck version
/// that was active when the answer was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub flashcard_index: usize,
    pub correct: bool,
}

/// Persisted, named flashcard set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub id: String,
    pub name: String,
    pub flashcards: Deck,
    pub created_at: DateTime<Utc>,
}

impl FlashcardSet {
    /// Listing entry for this set.
    pub fn summary(&self) -> SetSummary {
        SetSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            card_count: self.flashcards.len(),
            created_at: self.created_at,
        }
    }
}

/// Set listing entry with card count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSummary {
    pub id: String,
    pub name: String,
    pub card_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Destructive,
}

/// Dismissible message for the presentation shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level,
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, description)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Destructive, title, description)
    }
}
