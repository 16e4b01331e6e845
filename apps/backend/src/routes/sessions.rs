//! Study session endpoints
//!
//! Sessions live in the registry until the client ends them or they sit idle
//! past `SESSION_IDLE_SECS`. The answer handler releases the registry lock while the adapter runs, so
//! concurrent requests against the same session see `session_busy`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use flashgenius_core::{AnswerOutcome, AnswerReport, DeckAdapter, SessionStart, StudySession};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::profile::ProfileContext;
use crate::AppState;

/// POST /api/sessions
pub async fn start(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>> {
    match StudySession::start(payload.flashcards, payload.name, payload.id) {
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

/// GET /api/sessions/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let view = state.sessions.with_session(id, |s| Ok(s.view()))?;
    Ok(Json(view))
}

/// DELETE /api/sessions/:id
pub async fn end(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if !state.sessions.remove(id)? {
        return Err(ApiError::NotFound(format!("session {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sessions/:id/flip
pub async fn flip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlipResponse>> {
    let (is_flipped, session) = state
        .sessions
        .with_session(id, |s| Ok((s.flip()?, s.view())))?;
    Ok(Json(FlipResponse {
        is_flipped,
        session,
    }))
}

/// POST /api/sessions/:id/answer
pub async fn answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    let outcome = state.sessions.with_session(id, |s| s.answer(payload.correct))?;

    let (report, session) = match outcome {
        AnswerOutcome::Advanced { .. } => {
            let view = state.sessions.with_session(id, |s| Ok(s.view()))?;
            (AnswerReport::advanced(), view)
        }
        AnswerOutcome::PassComplete(request) => {
            let result = state.adapter.adapt(&request).await;
            let resolved = state.sessions.with_session(id, |s| {
                let resolution = s.resolve_adaptation(result)?;
                Ok((AnswerReport::resolved(resolution), s.view()))
            });
            match resolved {
                Ok(resolved) => resolved,
                Err(ApiError::NotFound(message)) => {
                    tracing::warn!(session_id = %id, "session ended during adaptation, result discarded");
                    return Err(ApiError::NotFound(message));
                }
                Err(e) => return Err(e),
            }
        }
    };

    Ok(Json(AnswerResponse {
        pass_complete: report.pass_complete(),
        adapted: report.resolution.as_ref().map(|r| r.is_adapted()),
        notices: report.notices,
        session,
    }))
}

/// POST /api/sessions/:id/navigate
pub async fn navigate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NavigateRequest>,
) -> Result<Json<SessionView>> {
    let view = state.sessions.with_session(id, |s| {
        s.navigate(payload.direction)?;
        Ok(s.view())
    })?;
    Ok(Json(view))
}

/// POST /api/sessions/:id/save
///
/// Without a name in the body the session's current set name is reused.
pub async fn save(
    State(state): State<AppState>,
    Extension(profile): Extension<ProfileContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveRequest>,
) -> Result<Json<SaveResponse>> {
    let store = state.db.for_profile(profile.as_deref());
    if store.is_none() {
        tracing::debug!(session_id = %id, "no profile context, save will not persist");
    }

    let (receipt, session) = state.sessions.with_session(id, |s| {
        let name = payload
            .name
            .or_else(|| s.set_name().map(str::to_string))
            .unwrap_or_default();
        let receipt = s.save(&name, &store)?;
        Ok((receipt, s.view()))
    })?;
    Ok(Json(SaveResponse { receipt, session }))
}
