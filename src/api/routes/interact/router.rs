//! Router for the interact API

use std::sync::Arc;

use axum::{Json, Router, extract::State, extract::rejection::JsonRejection, routing::post};

use super::public;
use crate::api::state::AppState;
use crate::relay::error::INVALID_BODY;
use crate::relay::{self, RelayError, RelayRequest, Role};
use crate::transcript::{StoreError, TranscriptStore};

type SharedState = Arc<AppState>;

/// Log the caller's latest turn and the reply without holding up the
/// response. Failures are only logged.
fn spawn_transcript_log(
    store: TranscriptStore,
    session_id: String,
    request: &RelayRequest,
    reply: &str,
) {
    let last_turn = request.last_turn().clone();
    let turn_index = request.history().len() as i64 - 1;
    let reply = reply.to_string();

    tokio::spawn(async move {
        let result = async {
            store
                .record(&session_id, turn_index, last_turn.role.as_str(), &last_turn.text)
                .await?;
            store
                .record(&session_id, turn_index + 1, Role::Assistant.as_str(), &reply)
                .await?;
            Ok::<(), StoreError>(())
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(session_id = %session_id, error = %e, "Failed to record transcript");
        }
    });
}

/// Relay the conversation to the provider and return its reply
async fn interact_handler(
    State(state): State<SharedState>,
    payload: Result<Json<public::InteractRequest>, JsonRejection>,
) -> Result<Json<public::InteractResponse>, RelayError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!("Invalid interact body: {}", rejection.body_text());
        RelayError::Validation(INVALID_BODY)
    })?;

    let session_id = payload.session_id.clone().filter(|id| !id.trim().is_empty());
    let request = RelayRequest::try_from(payload)?;

    let text = relay::interact(state.provider.as_ref(), &state.http, &request).await?;

    if let Some(session_id) = session_id {
        spawn_transcript_log(state.store.clone(), session_id, &request, &text);
    }

    Ok(Json(public::InteractResponse::new(&text)))
}

/// Create the interact router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(interact_handler))
}
