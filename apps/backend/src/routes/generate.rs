//! Flashcard generation endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use flashgenius_core::{
    generate_from_document, generate_from_topic, DocumentPayload, TopicRequest, ValidationError,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/generate/topic
pub async fn topic(
    State(state): State<AppState>,
    Json(payload): Json<GenerateTopicRequest>,
) -> Result<Json<GenerationResponse>> {
    let request = TopicRequest::new(&payload.topic, payload.number_of_flashcards)?;
    let outcome = generate_from_topic(state.llm.as_ref(), &request).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/generate/document
///
/// Oversized uploads are reported as validation errors, not as axum's
/// plain-text 413.
pub async fn document(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateDocumentRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>> {
    let Json(payload) = payload.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::from(ValidationError::DocumentTooLarge {
            max_bytes: state.max_document_bytes,
        }),
        _ => ApiError::BadRequest(rejection.body_text()),
    })?;
    let document = DocumentPayload::from_data_uri(&payload.document_data_uri, payload.file_name)?;
    let outcome = generate_from_document(state.llm.as_ref(), &document).await?;
    Ok(Json(outcome.into()))
}
