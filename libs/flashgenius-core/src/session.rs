//! Study session state machine.
//!
//! A session walks a deck one card at a time. Answering the last card ends a
//! pass: the session enters the adapting phase, hands its deck and
//! performance log to a [`DeckAdapter`], and waits for the reordered deck.
//! While adapting, `flip`, `answer` and `navigate` are refused with
//! [`SessionError::Busy`].
//!
//! The adaptation call is split into [`StudySession::answer`] and
//! [`StudySession::resolve_adaptation`] so callers that keep sessions behind
//! a lock can release it while the remote call is outstanding.
//! [`StudySession::answer_with`] does both for callers that own the session.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::adaptation::{ensure_cardinality, AdaptationRequest, DeckAdapter};
use crate::error::{Result, ServiceError, SessionError, ValidationError};
use crate::id::mint_set_id;
use crate::store::FlashcardStore;
use crate::types::{Deck, Flashcard, FlashcardSet, Notice, PerformanceEntry};

/// Manual navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[serde(alias = "prev")]
    Previous,
    Next,
}

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Reviewing,
    Adapting,
}

/// Result of starting a session.
#[derive(Debug, Clone)]
pub enum SessionStart {
    Reviewing(StudySession),
    /// The deck had no cards; there is nothing to study.
    Empty,
}

/// What happened after an answer was recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// Moved on to the next card of the same pass.
    Advanced { cursor: usize },
    /// The last card was answered; this request must be sent to an adapter
    /// and its result handed to [`StudySession::resolve_adaptation`].
    PassComplete(AdaptationRequest),
}

/// How a pass boundary was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum AdaptationResolution {
    /// The adapted deck was installed and a new pass started.
    Adapted { notice: Notice },
    /// The adapter failed; deck, cursor and log are unchanged.
    KeptCurrentOrder { error: ServiceError, notice: Notice },
}

impl AdaptationResolution {
    pub fn notice(&self) -> &Notice {
        match self {
            Self::Adapted { notice } | Self::KeptCurrentOrder { notice, .. } => notice,
        }
    }

    pub fn is_adapted(&self) -> bool {
        matches!(self, Self::Adapted { .. })
    }
}

/// Summary of one answer, including any pass-boundary resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnswerReport {
    pub resolution: Option<AdaptationResolution>,
    pub notices: Vec<Notice>,
}

impl AnswerReport {
    pub fn advanced() -> Self {
        Self::default()
    }

    pub fn resolved(resolution: AdaptationResolution) -> Self {
        let notices = vec![
            Notice::info(
                "Pass Complete!",
                "Adapting flashcards based on your performance...",
            ),
            resolution.notice().clone(),
        ];
        Self {
            resolution: Some(resolution),
            notices,
        }
    }

    pub fn pass_complete(&self) -> bool {
        self.resolution.is_some()
    }
}

/// Result of saving a session's deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveReceipt {
    pub id: String,
    pub name: String,
    /// True when a new id was minted for this save.
    pub created: bool,
    pub notice: Notice,
}

/// Serializable snapshot for the presentation shell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: Phase,
    /// 1-based position of the current card.
    pub position: usize,
    pub total: usize,
    pub progress_percent: f64,
    pub card: Flashcard,
    pub is_flipped: bool,
    pub performance_log: Vec<PerformanceEntry>,
    pub adaptation_in_flight: bool,
    pub pass: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_id: Option<String>,
}

/// In-memory state of one study session. Never persisted directly.
#[derive(Debug, Clone)]
pub struct StudySession {
    deck: Deck,
    /// Deck as supplied at start; this is what gets saved.
    original: Deck,
    cursor: usize,
    is_flipped: bool,
    performance_log: Vec<PerformanceEntry>,
    adaptation_in_flight: bool,
    pass: u32,
    set_name: Option<String>,
    set_id: Option<String>,
}

impl StudySession {
    /// Begin a session. An empty deck yields [`SessionStart::Empty`].
    pub fn start(deck: Deck, name: Option<String>, id: Option<String>) -> SessionStart {
        if deck.is_empty() {
            return SessionStart::Empty;
        }

        SessionStart::Reviewing(Self {
            original: deck.clone(),
            deck,
            cursor: 0,
            is_flipped: false,
            performance_log: Vec::new(),
            adaptation_in_flight: false,
            pass: 1,
            set_name: name.filter(|n| !n.trim().is_empty()),
            set_id: id,
        })
    }

    /// Begin a session over a stored set, keeping its identity for saves.
    pub fn from_set(set: FlashcardSet) -> SessionStart {
        Self::start(set.flashcards, Some(set.name), Some(set.id))
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.adaptation_in_flight {
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    /// Toggle the current card. Returns the new flip state.
    pub fn flip(&mut self) -> Result<bool> {
        self.ensure_idle()?;
        self.is_flipped = !self.is_flipped;
        Ok(self.is_flipped)
    }

    /// Record an answer for the current card.
    pub fn answer(&mut self, correct: bool) -> Result<AnswerOutcome> {
        self.ensure_idle()?;

        self.performance_log.push(PerformanceEntry {
            flashcard_index: self.cursor,
            correct,
        });
        self.is_flipped = false;

        if self.cursor + 1 < self.deck.len() {
            self.cursor += 1;
            return Ok(AnswerOutcome::Advanced {
                cursor: self.cursor,
            });
        }

        self.adaptation_in_flight = true;
        tracing::debug!(
            pass = self.pass,
            cards = self.deck.len(),
            answers = self.performance_log.len(),
            "pass complete, requesting adaptation"
        );
        Ok(AnswerOutcome::PassComplete(AdaptationRequest {
            flashcards: self.deck.clone(),
            user_performance: self.performance_log.clone(),
        }))
    }

    /// Apply the adapter's answer to the outstanding pass boundary.
    ///
    /// A response with a different card count is treated as a failure.
    pub fn resolve_adaptation(
        &mut self,
        result: std::result::Result<Deck, ServiceError>,
    ) -> Result<AdaptationResolution> {
        if !self.adaptation_in_flight {
            return Err(SessionError::NoAdaptationPending);
        }
        self.adaptation_in_flight = false;

        match result.and_then(|deck| ensure_cardinality(self.deck.len(), deck)) {
            Ok(deck) => {
                self.deck = deck;
                self.cursor = 0;
                self.performance_log.clear();
                self.pass += 1;
                tracing::debug!(pass = self.pass, "installed adapted deck");
                Ok(AdaptationResolution::Adapted {
                    notice: Notice::success(
                        "Flashcards Adapted!",
                        "Starting a new pass with reordered cards.",
                    ),
                })
            }
            Err(error) => {
                tracing::warn!(%error, pass = self.pass, "adaptation failed, keeping current order");
                Ok(AdaptationResolution::KeptCurrentOrder {
                    error,
                    notice: Notice::destructive(
                        "Error Adapting Cards",
                        "Could not adapt flashcards. Continuing with current order.",
                    ),
                })
            }
        }
    }

    /// Record an answer and, at a pass boundary, run the adapter to completion.
    pub async fn answer_with<A: DeckAdapter>(
        &mut self,
        correct: bool,
        adapter: &A,
    ) -> Result<AnswerReport> {
        match self.answer(correct)? {
            AnswerOutcome::Advanced { .. } => Ok(AnswerReport::advanced()),
            AnswerOutcome::PassComplete(request) => {
                let result = adapter.adapt(&request).await;
                let resolution = self.resolve_adaptation(result)?;
                Ok(AnswerReport::resolved(resolution))
            }
        }
    }

    /// Move one card back or forward. No-op at either end. Returns the cursor.
    pub fn navigate(&mut self, direction: Direction) -> Result<usize> {
        self.ensure_idle()?;
        self.is_flipped = false;
        match direction {
            Direction::Previous => self.cursor = self.cursor.saturating_sub(1),
            Direction::Next if self.cursor + 1 < self.deck.len() => self.cursor += 1,
            Direction::Next => {}
        }
        Ok(self.cursor)
    }

    /// Persist the original deck under `name`.
    ///
    /// Reuses the session's set id when it has one, otherwise mints a new id.
    /// A detached store never binds the session to the minted id, so a later
    /// save against a real store mints again.
    pub fn save<S: FlashcardStore + ?Sized>(&mut self, name: &str, store: &S) -> Result<SaveReceipt> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankSetName.into());
        }

        let (id, created) = match &self.set_id {
            Some(id) => (id.clone(), store.get_by_id(id)?.is_none()),
            None => (mint_set_id(store)?, true),
        };

        let set = FlashcardSet {
            id: id.clone(),
            name: name.to_string(),
            flashcards: self.original.clone(),
            created_at: Utc::now(),
        };
        store.save(&set)?;
        tracing::info!(id = %id, name, created, cards = set.flashcards.len(), "saved flashcard set");

        if store.is_attached() {
            self.set_id = Some(id.clone());
        }
        self.set_name = Some(set.name.clone());

        Ok(SaveReceipt {
            notice: Notice::success("Set Saved!", format!("\"{}\" has been saved.", set.name)),
            id,
            name: set.name,
            created,
        })
    }

    pub fn phase(&self) -> Phase {
        if self.adaptation_in_flight {
            Phase::Adapting
        } else {
            Phase::Reviewing
        }
    }

    pub fn deck(&self) -> &[Flashcard] {
        &self.deck
    }

    pub fn original_deck(&self) -> &[Flashcard] {
        &self.original
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_card(&self) -> &Flashcard {
        &self.deck[self.cursor]
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn performance_log(&self) -> &[PerformanceEntry] {
        &self.performance_log
    }

    pub fn adaptation_in_flight(&self) -> bool {
        self.adaptation_in_flight
    }

    pub fn pass(&self) -> u32 {
        self.pass
    }

    pub fn set_name(&self) -> Option<&str> {
        self.set_name.as_deref()
    }

    pub fn set_id(&self) -> Option<&str> {
        self.set_id.as_deref()
    }

    pub fn view(&self) -> SessionView {
        let total = self.deck.len();
        SessionView {
            phase: self.phase(),
            position: self.cursor + 1,
            total,
            progress_percent: (self.cursor + 1) as f64 / total as f64 * 100.0,
            card: self.current_card().clone(),
            is_flipped: self.is_flipped,
            performance_log: self.performance_log.clone(),
            adaptation_in_flight: self.adaptation_in_flight,
            pass: self.pass,
            set_name: self.set_name.clone(),
            set_id: self.set_id.clone(),
        }
    }
}
