//! LLM providers the relay can forward a conversation to. Each
//! provider only knows how to shape its request and where to find the
//! text in its response. Sending the request and mapping failures is
//! shared by every provider in `Provider::generate`.

mod gemini;
mod ollama;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

use crate::core::{AppConfig, ProviderKind};
use crate::relay::{RelayError, RelayRequest};

#[async_trait]
pub trait Provider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// A POST request to the provider's endpoint with credentials
    /// attached.
    fn post(&self, client: &Client) -> RequestBuilder;

    /// Build the JSON body the provider expects for `request`.
    fn payload(&self, request: &RelayRequest) -> Result<Value, RelayError>;

    /// Find the generated text in a successful response body.
    fn extract_text<'a>(&self, response: &'a Value) -> Option<&'a str>;

    /// Pull a readable reason out of an error response body for logging.
    fn error_detail(&self, body: &str) -> String {
        body.to_string()
    }

    /// Send one request for `request` and return the trimmed text. No
    /// retries and no timeout beyond the client's default.
    async fn generate(&self, client: &Client, request: &RelayRequest) -> Result<String, RelayError> {
        let payload = self.payload(request)?;

        let response = self
            .post(client)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                // The URL can carry a credential in its query string
                let e = e.without_url();
                if e.is_builder() {
                    RelayError::Internal(e.into())
                } else {
                    RelayError::Unreachable(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(error = %e.without_url(), "Failed to read error response body");
                    String::new()
                }
            };
            return Err(RelayError::UpstreamStatus {
                status: status.as_u16(),
                body: self.error_detail(&body),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| {
                RelayError::Malformed(format!("Response is not JSON: {}", e.without_url()))
            })?;

        let text = self.extract_text(&body).ok_or_else(|| {
            RelayError::Malformed(format!("Missing generated text in response: {}", body))
        })?;

        Ok(text.trim().to_string())
    }
}

pub type SharedProvider = Arc<dyn Provider>;

/// Construct the provider selected in the config.
pub fn from_config(config: &AppConfig) -> Result<SharedProvider> {
    let provider: SharedProvider = match config.provider {
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            &config.ollama_api_hostname,
            &config.ollama_model,
            &config.assistant_name,
        )?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(
            &config.gemini_api_hostname,
            &config.gemini_model,
            &config.gemini_api_key,
            config.gemini_safety_threshold.as_deref(),
        )?),
    };
    Ok(provider)
}
