//! API request and response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export shared types from flashgenius-core
pub use flashgenius_core::{
    AdaptationRequest, Deck, Direction, Flashcard, FlashcardSet, GenerationOutcome, Notice,
    PerformanceEntry, SaveReceipt, SessionView, SetSummary,
};

// === Generation ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTopicRequest {
    pub topic: String,
    #[serde(default)]
    pub number_of_flashcards: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateDocumentRequest {
    pub document_data_uri: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResponse {
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
    pub notice: Notice,
}

impl From<GenerationOutcome> for GenerationResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            notice: outcome.notice(),
            outcome,
        }
    }
}

// === Adaptation ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptResponse {
    pub flashcards: Deck,
}

// === Sets ===

#[derive(Debug, Clone, Serialize)]
pub struct SetListResponse {
    pub sets: Vec<SetSummary>,
}

// === Sessions ===

#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionRequest {
    pub flashcards: Deck,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StartSessionResponse {
    Reviewing {
        session_id: Uuid,
        session: SessionView,
    },
    Empty {
        notice: Notice,
    },
}

impl StartSessionResponse {
    pub fn empty() -> Self {
        Self::Empty {
            notice: Notice::info(
                "No Flashcards",
                "No flashcards to display. This set might be empty.",
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlipResponse {
    pub is_flipped: bool,
    pub session: SessionView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub pass_complete: bool,
    /// Present when the pass ended: whether the adapted deck was installed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapted: Option<bool>,
    pub notices: Vec<Notice>,
    pub session: SessionView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigateRequest {
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    #[serde(flatten)]
    pub receipt: SaveReceipt,
    pub session: SessionView,
}
