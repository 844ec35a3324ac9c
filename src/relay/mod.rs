//! The relay takes a conversation supplied by the caller, hands it to
//! the configured provider and returns the generated text. It keeps
//! no state between calls.

pub mod error;
pub mod prompt;

use reqwest::Client;
use serde::{Deserialize, Serialize};

pub use error::RelayError;

use crate::providers::Provider;
use error::{MISSING_HISTORY, MISSING_SYSTEM_PROMPT};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    // The frontend and Gemini both call the assistant "model"
    #[serde(rename = "assistant", alias = "model")]
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn new(role: Role, text: &str) -> Self {
        Self {
            role,
            text: text.to_string(),
        }
    }
}

/// A validated request. History is never empty and the system prompt
/// is never blank.
#[derive(Clone, Debug)]
pub struct RelayRequest {
    history: Vec<ConversationTurn>,
    system_prompt: String,
}

impl RelayRequest {
    pub fn new(history: Vec<ConversationTurn>, system_prompt: &str) -> Result<Self, RelayError> {
        if history.is_empty() {
            return Err(RelayError::Validation(MISSING_HISTORY));
        }
        if system_prompt.trim().is_empty() {
            return Err(RelayError::Validation(MISSING_SYSTEM_PROMPT));
        }
        Ok(Self {
            history,
            system_prompt: system_prompt.to_string(),
        })
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// The most recent turn in the conversation.
    pub fn last_turn(&self) -> &ConversationTurn {
        // Non-empty is checked in `new`
        &self.history[self.history.len() - 1]
    }
}

/// Get the next assistant reply for `request` from `provider`.
pub async fn interact(
    provider: &dyn Provider,
    client: &Client,
    request: &RelayRequest,
) -> Result<String, RelayError> {
    tracing::debug!(
        provider = provider.name(),
        turns = request.history().len(),
        "Relaying conversation"
    );

    let text = provider.generate(client, request).await?;

    tracing::debug!(
        provider = provider.name(),
        chars = text.len(),
        "Received provider response"
    );
    Ok(text)
}
