//! Router for the sessions API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use super::public;
use crate::api::public::{ApiError, error_response};
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

/// Get the logged transcript and summary for a session
async fn session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let interactions = state.store.find_interactions(&id).await?;
    let summary = state.store.find_summary(&id).await?;

    if interactions.is_empty() && summary.is_none() {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            &format!("Session {} not found", id),
        ));
    }

    Ok(Json(public::SessionResponse {
        session_id: id,
        interactions,
        summary,
    })
    .into_response())
}

/// Create the sessions router
pub fn router() -> Router<SharedState> {
    Router::new().route("/{id}", get(session))
}
