//! Flashcard generation boundary.
//!
//! Inputs are validated here, before anything reaches the model provider.
//! A generator that succeeds with zero cards yields
//! [`GenerationOutcome::Empty`], which is reported differently from a failure.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ValidationError};
use crate::types::{Deck, Notice};

/// Media types accepted for document uploads.
pub const ACCEPTED_MEDIA_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.ms-powerpoint",
];

pub const DEFAULT_CARD_COUNT: u32 = 5;
pub const MIN_CARD_COUNT: u32 = 1;
pub const MAX_CARD_COUNT: u32 = 50;

/// Validated topic generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicRequest {
    topic: String,
    number_of_flashcards: u32,
}

impl TopicRequest {
    /// Trims the topic and clamps the card count into `1..=50`.
    /// A missing count means the default of 5.
    pub fn new(topic: &str, number_of_flashcards: Option<i64>) -> Result<Self, ValidationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ValidationError::BlankTopic);
        }

        let count = number_of_flashcards
            .unwrap_or(DEFAULT_CARD_COUNT as i64)
            .clamp(MIN_CARD_COUNT as i64, MAX_CARD_COUNT as i64) as u32;

        Ok(Self {
            topic: topic.to_string(),
            number_of_flashcards: count,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn number_of_flashcards(&self) -> u32 {
        self.number_of_flashcards
    }
}

/// Uploaded document carried as a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    media_type: String,
    data_uri: String,
    byte_len: usize,
    file_name: Option<String>,
}

impl DocumentPayload {
    /// Parse `data:<media-type>;base64,<payload>`.
    pub fn from_data_uri(data_uri: &str, file_name: Option<String>) -> Result<Self, ValidationError> {
        let rest = data_uri
            .strip_prefix("data:")
            .ok_or_else(|| ValidationError::UnreadableDocument("not a data URI".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ValidationError::UnreadableDocument("missing payload".to_string()))?;

        let mut params = header.split(';');
        let media_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(ValidationError::UnreadableDocument(
                "payload is not base64 encoded".to_string(),
            ));
        }
        Self::check_media_type(&media_type)?;

        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| ValidationError::UnreadableDocument(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ValidationError::UnreadableDocument("document is empty".to_string()));
        }

        Ok(Self {
            data_uri: format!("data:{};base64,{}", media_type, payload.trim()),
            media_type,
            byte_len: bytes.len(),
            file_name,
        })
    }

    /// Build a payload from raw file contents.
    pub fn from_bytes(
        media_type: &str,
        bytes: &[u8],
        file_name: Option<String>,
    ) -> Result<Self, ValidationError> {
        let media_type = media_type.trim().to_ascii_lowercase();
        Self::check_media_type(&media_type)?;
        if bytes.is_empty() {
            return Err(ValidationError::UnreadableDocument("document is empty".to_string()));
        }

        Ok(Self {
            data_uri: format!("data:{};base64,{}", media_type, BASE64.encode(bytes)),
            media_type,
            byte_len: bytes.len(),
            file_name,
        })
    }

    fn check_media_type(media_type: &str) -> Result<(), ValidationError> {
        if ACCEPTED_MEDIA_TYPES.contains(&media_type) {
            Ok(())
        } else {
            Err(ValidationError::UnsupportedMediaType(media_type.to_string()))
        }
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Decoded size in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// File name without its extension, used as the default set name.
    pub fn suggested_name(&self) -> Option<String> {
        self.file_name.as_deref().map(strip_extension)
    }
}

fn strip_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem.to_string(),
        _ => file_name.to_string(),
    }
}

/// Trait for flashcard generation services.
#[async_trait]
pub trait FlashcardGenerator: Send + Sync {
    /// Generate cards about a topic.
    async fn from_topic(&self, request: &TopicRequest) -> Result<Deck, ServiceError>;

    /// Generate cards covering a document.
    async fn from_document(&self, document: &DocumentPayload) -> Result<Deck, ServiceError>;
}

/// Result of a successful generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Generated {
        flashcards: Deck,
        suggested_name: String,
    },
    Empty,
}

impl GenerationOutcome {
    fn from_deck(flashcards: Deck, suggested_name: String) -> Self {
        if flashcards.is_empty() {
            Self::Empty
        } else {
            Self::Generated {
                flashcards,
                suggested_name,
            }
        }
    }

    /// Notice to show once generation finishes.
    pub fn notice(&self) -> Notice {
        match self {
            Self::Generated {
                flashcards,
                suggested_name,
            } => Notice::success(
                "Flashcards Generated!",
                format!("{} cards created for \"{}\".", flashcards.len(), suggested_name),
            ),
            Self::Empty => Notice::destructive(
                "No Flashcards Generated",
                "The AI couldn't generate flashcards for this input.",
            ),
        }
    }
}

/// Generate from a topic; the topic doubles as the suggested set name.
pub async fn generate_from_topic<G: FlashcardGenerator>(
    generator: &G,
    request: &TopicRequest,
) -> Result<GenerationOutcome, ServiceError> {
    let flashcards = generator.from_topic(request).await?;
    tracing::debug!(
        topic = request.topic(),
        requested = request.number_of_flashcards(),
        generated = flashcards.len(),
        "generated flashcards from topic"
    );
    Ok(GenerationOutcome::from_deck(flashcards, request.topic().to_string()))
}

/// Generate from a document; the file stem becomes the suggested set name.
pub async fn generate_from_document<G: FlashcardGenerator>(
    generator: &G,
    document: &DocumentPayload,
) -> Result<GenerationOutcome, ServiceError> {
    let flashcards = generator.from_document(document).await?;
    tracing::debug!(
        media_type = document.media_type(),
        bytes = document.byte_len(),
        generated = flashcards.len(),
        "generated flashcards from document"
    );
    let suggested_name = document
        .suggested_name()
        .unwrap_or_else(|| "Uploaded document".to_string());
    Ok(GenerationOutcome::from_deck(flashcards, suggested_name))
}
