//! Saved flashcard set endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use flashgenius_core::{newest_first, FlashcardStore, SessionStart, StudySession};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::profile::ProfileContext;
use crate::AppState;

/// GET /api/sets
pub async fn list(
    State(state): State<AppState>,
    Extension(profile): Extension<ProfileContext>,
) -> Result<Json<SetListResponse>> {
    let store = state.db.for_profile(profile.as_deref());
    let sets = newest_first(store.list_all()?)
        .iter()
        .map(FlashcardSet::summary)
        .collect();
    Ok(Json(SetListResponse { sets }))
}

/// GET /api/sets/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(profile): Extension<ProfileContext>,
    Path(id): Path<String>,
) -> Result<Json<FlashcardSet>> {
    let store = state.db.for_profile(profile.as_deref());
    let set = store
        .get_by_id(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("set {}", id)))?;
    Ok(Json(set))
}

/// DELETE /api/sets/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(profile): Extension<ProfileContext>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let store = state.db.for_profile(profile.as_deref());
    if store.get_by_id(&id)?.is_none() {
        return Err(ApiError::NotFound(format!("set {}", id)));
    }
    store.delete(&id)?;
    tracing::info!(set_id = %id, "deleted flashcard set");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sets/:id/study
pub async fn study(
    State(state): State<AppState>,
    Extension(profile): Extension<ProfileContext>,
    Path(id): Path<String>,
) -> Result<Json<StartSessionResponse>> {
    let set = state
        .db
        .for_profile(profile.as_deref())
        .get_by_id(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("set {}", id)))?;

    match StudySession::from_set(set) {
        SessionStart::Reviewing(session) => {
            let view = session.view();
            let session_id = state.sessions.insert(session)?;
            Ok(Json(StartSessionResponse::Reviewing {
                session_id,
                session: view,
            }))
        }
        SessionStart::Empty => Ok(Json(StartSessionResponse::empty())),
    }
}
