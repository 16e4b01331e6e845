//! Stateless adaptation endpoint

use axum::{extract::State, Json};
use flashgenius_core::{validate_adapted, DeckAdapter};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /api/adapt
///
/// Reorders a deck with the configured adapter. Responses that add or drop
/// cards are rejected with a service error.
pub async fn adapt(
    State(state): State<AppState>,
    Json(request): Json<AdaptationRequest>,
) -> Result<Json<AdaptResponse>> {
    let adapted = state.adapter.adapt(&request).await?;
    let flashcards = validate_adapted(&request, adapted)?;
    Ok(Json(AdaptResponse { flashcards }))
}
