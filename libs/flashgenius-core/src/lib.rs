//! Core flashcard library for FlashGenius.
//!
//! Provides:
//! - Shared types (Flashcard, FlashcardSet, PerformanceEntry, Notice)
//! - The study session state machine and its adaptation protocol
//! - Boundary validation for flashcard generation requests
//! - The flashcard store contract and set id minting

pub mod adaptation;
pub mod error;
pub mod generation;
pub mod id;
pub mod session;
pub mod store;
pub mod types;

pub use adaptation::{validate_adapted, AdaptationRequest, DeckAdapter, PerformanceReorder};
pub use error::{Result, ServiceError, SessionError, StoreError, ValidationError};
pub use generation::{
    generate_from_document, generate_from_topic, DocumentPayload, FlashcardGenerator,
    GenerationOutcome, TopicRequest,
};
pub use id::mint_set_id;
pub use session::{
    AdaptationResolution, AnswerOutcome, AnswerReport, Direction, Phase, SaveReceipt,
    SessionStart, SessionView, StudySession,
};
pub use store::{newest_first, FlashcardStore, MemoryStore};
pub use types::{Deck, Flashcard, FlashcardSet, Notice, NoticeLevel, PerformanceEntry, SetSummary};
