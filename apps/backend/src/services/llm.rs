//! Model provider client.
//!
//! Talks to an OpenAI-compatible chat completions endpoint. Every flow asks
//! the model for a bare JSON array; anything else is an invalid response.

use async_trait::async_trait;
use flashgenius_core::{
    validate_adapted, AdaptationRequest, Deck, DeckAdapter, DocumentPayload, Flashcard,
    FlashcardGenerator, ServiceError, TopicRequest,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::LlmConfig;

/// Chat completions client used for generation and adaptation.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

// === Wire Types ===

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: String },
    File { file: FilePart<'a> },
}

#[derive(Debug, Serialize)]
struct FilePart<'a> {
    filename: &'a str,
    file_data: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Card shape returned by topic generation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuestionAnswer {
    question: String,
    answer: String,
}

/// Card shape returned by document generation and adaptation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontBack {
    front: String,
    back: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user message and return the assistant's text.
    async fn complete(&self, content: Vec<ContentPart<'_>>) -> Result<String, ServiceError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| ServiceError::Remote(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Remote(format!("{} - {}", status, message)));
        }

        let response: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ServiceError::InvalidResponse("response has no message content".to_string()))
    }
}

#[async_trait]
impl FlashcardGenerator for LlmClient {
    async fn from_topic(&self, request: &TopicRequest) -> Result<Deck, ServiceError> {
        let text = self
            .complete(vec![ContentPart::Text {
                text: topic_prompt(request),
            }])
            .await?;
        let cards: Vec<QuestionAnswer> = parse_card_array(&text)?;
        Ok(cards
            .into_iter()
            .map(|c| Flashcard::new(c.question, c.answer))
            .collect())
    }

    async fn from_document(&self, document: &DocumentPayload) -> Result<Deck, ServiceError> {
        tracing::info!(
            media_type = document.media_type(),
            bytes = document.byte_len(),
            digest = %payload_digest(document.data_uri()),
            "sending document to model"
        );
        let text = self
            .complete(vec![
                ContentPart::Text {
                    text: DOCUMENT_PROMPT.to_string(),
                },
                ContentPart::File {
                    file: FilePart {
                        filename: document.file_name().unwrap_or("document"),
                        file_data: document.data_uri(),
                    },
                },
            ])
            .await?;
        parse_front_back(&text)
    }
}

#[async_trait]
impl DeckAdapter for LlmClient {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn adapt(&self, request: &AdaptationRequest) -> Result<Deck, ServiceError> {
        let text = self
            .complete(vec![ContentPart::Text {
                text: adaptation_prompt(request),
            }])
            .await?;
        let adapted = parse_front_back(&text)?;
        validate_adapted(request, adapted)
    }
}

// === Prompts ===

const DOCUMENT_PROMPT: &str = "You are an expert educator. Create flashcards from the attached document.\n\
Cover the key concepts and facts it contains. Each flashcard has a front and a back.\n\
Respond with only a JSON array of objects with \"front\" and \"back\" string fields, for example:\n\
[{\"front\": \"What is the capital of France?\", \"back\": \"Paris\"}]\n\
Do not include any text outside the JSON array.";

fn topic_prompt(request: &TopicRequest) -> String {
    format!(
        "You are an expert at creating flashcards. Generate {} flashcards on the topic of {}.\n\
         Each flashcard has a question and an answer.\n\
         Respond with only a JSON array of objects with \"question\" and \"answer\" string fields.",
        request.number_of_flashcards(),
        request.topic()
    )
}

fn adaptation_prompt(request: &AdaptationRequest) -> String {
    let mut prompt = String::from(
        "You reorder flashcards based on a learner's performance.\n\
         Put the cards the learner answered incorrectly most often first.\n\
         If there is no performance data, keep the original order.\n\
         Return every card exactly once, unchanged. Do not add or remove cards.\n\n\
         Flashcards:\n",
    );
    for (index, card) in request.flashcards.iter().enumerate() {
        prompt.push_str(&format!(
            "Flashcard {}:\nFront: {}\nBack: {}\n",
            index, card.front, card.back
        ));
    }
    if !request.user_performance.is_empty() {
        prompt.push_str("\nPerformance:\n");
        for entry in &request.user_performance {
            prompt.push_str(&format!(
                "Flashcard Index: {}, Correct: {}\n",
                entry.flashcard_index, entry.correct
            ));
        }
    }
    prompt.push_str(
        "\nRespond with only a JSON array of objects with \"front\" and \"back\" string fields.",
    );
    prompt
}

// === Response Parsing ===

fn parse_front_back(text: &str) -> Result<Deck, ServiceError> {
    let cards: Vec<FrontBack> = parse_card_array(text)?;
    Ok(cards
        .into_iter()
        .map(|c| Flashcard::new(c.front, c.back))
        .collect())
}

/// Parse a model reply that must be exactly one JSON array.
/// A single enclosing markdown code fence is stripped first.
fn parse_card_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, ServiceError> {
    let body = strip_code_fence(text.trim());
    serde_json::from_str(body).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    match inner.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => text,
    }
}

/// Hex SHA-256 of a payload, for logging documents without their content.
pub fn payload_digest(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    format!("{:x}", hasher.finalize())
}
