//! Router for the summary API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use super::public;
use crate::api::public::{ApiError, error_response};
use crate::api::state::AppState;
use crate::transcript::StoreError;

type SharedState = Arc<AppState>;

/// Save the summary at the end of a session. A session can only be
/// summarized once.
async fn save_summary(
    State(state): State<SharedState>,
    payload: Result<Json<public::SummaryRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                &rejection.body_text(),
            ));
        }
    };

    if payload.session_id.trim().is_empty() || payload.dominant_trait.trim().is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            "Missing session_id or dominant_trait",
        ));
    }

    let result = state
        .store
        .save_summary(&payload.session_id, &payload.dominant_trait, &payload.scores)
        .await;

    match result {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({ "success": true })),
        )
            .into_response()),
        Err(e @ StoreError::DuplicateSummary(_)) => {
            tracing::warn!("{}", e);
            Ok(error_response(StatusCode::CONFLICT, &e.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Create the summary router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(save_summary))
}
