//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{Router, body::Body};
use tokio_rusqlite::Connection;

use kai::api::AppState;
use kai::api::app;
use kai::providers::{GeminiProvider, OllamaProvider, SharedProvider};
use kai::transcript::TranscriptStore;

/// An in-memory transcript store with the schema applied.
pub async fn test_store() -> TranscriptStore {
    let db = Connection::open_in_memory()
        .await
        .expect("Failed to open in-memory db");
    let store = TranscriptStore::new(db);
    store.init().await.expect("Failed to migrate db");
    store
}

/// A store that was never initialized so every query fails.
pub async fn broken_store() -> TranscriptStore {
    let db = Connection::open_in_memory()
        .await
        .expect("Failed to open in-memory db");
    TranscriptStore::new(db)
}

pub fn ollama_provider(url: &str) -> SharedProvider {
    Arc::new(OllamaProvider::new(url, "llama3:8b", "Kai").expect("Failed to build provider"))
}

pub fn gemini_provider(url: &str) -> SharedProvider {
    Arc::new(
        GeminiProvider::new(url, "gemini-test", "test-api-key", None)
            .expect("Failed to build provider"),
    )
}

pub fn app_with(provider: SharedProvider, store: TranscriptStore) -> Router {
    app(Arc::new(AppState::new(provider, store)))
}

/// Creates a test application router backed by a local provider at
/// `provider_url` and an in-memory store. The store is returned so
/// tests can check what was logged.
pub async fn test_app(provider_url: &str) -> (Router, TranscriptStore) {
    let store = test_store().await;
    let app = app_with(ollama_provider(provider_url), store.clone());
    (app, store)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).expect("Body is not JSON")
}
