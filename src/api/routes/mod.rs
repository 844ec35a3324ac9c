//! API routes module

pub mod interact;
pub mod sessions;
pub mod summary;

use std::sync::Arc;

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<AppState>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Relay a conversation to the LLM provider
        .nest("/interact", interact::router())
        // End-of-session summaries
        .nest("/summary", summary::router())
        // Logged transcripts and summaries by session
        .nest("/sessions", sessions::router())
}
