use reqwest::Client;

use crate::providers::SharedProvider;
use crate::transcript::TranscriptStore;

/// Shared by every request handler. Nothing in here is mutated after
/// startup so it is shared behind an `Arc` without a lock.
pub struct AppState {
    pub provider: SharedProvider,
    // Reused across requests for connection pooling
    pub http: Client,
    pub store: TranscriptStore,
}

impl AppState {
    pub fn new(provider: SharedProvider, store: TranscriptStore) -> Self {
        Self {
            provider,
            http: Client::new(),
            store,
        }
    }
}
