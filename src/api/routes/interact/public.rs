//! Public types for the interact API
use serde::{Deserialize, Serialize};

use crate::relay::error::{MISSING_HISTORY, MISSING_TURN_TEXT};
use crate::relay::{ConversationTurn, RelayError, RelayRequest, Role};

#[derive(Deserialize, Debug)]
pub struct Part {
    pub text: String,
}

/// A turn as the frontend sends it. Either the Gemini style
/// `{"role": "user", "parts": [{"text": "Hi"}]}` or the flat
/// `{"role": "user", "text": "Hi"}`.
#[derive(Deserialize, Debug)]
pub struct Turn {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub text: Option<String>,
}

impl TryFrom<Turn> for ConversationTurn {
    type Error = RelayError;

    fn try_from(turn: Turn) -> Result<Self, Self::Error> {
        let text = match turn.text {
            Some(text) => text,
            None if !turn.parts.is_empty() => turn
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join(""),
            None => return Err(RelayError::Validation(MISSING_TURN_TEXT)),
        };
        Ok(ConversationTurn {
            role: turn.role,
            text,
        })
    }
}

#[derive(Deserialize, Debug)]
pub struct InteractRequest {
    #[serde(default)]
    pub history: Option<Vec<Turn>>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    // When set, the turn is logged to the transcript store
    #[serde(default)]
    pub session_id: Option<String>,
}

impl TryFrom<InteractRequest> for RelayRequest {
    type Error = RelayError;

    fn try_from(req: InteractRequest) -> Result<Self, Self::Error> {
        let history = req
            .history
            .ok_or(RelayError::Validation(MISSING_HISTORY))?
            .into_iter()
            .map(ConversationTurn::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        RelayRequest::new(history, req.system_prompt.as_deref().unwrap_or_default())
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InteractResponse {
    #[serde(rename = "aiResponse")]
    pub ai_response: String,
}

impl InteractResponse {
    pub fn new(ai_response: &str) -> Self {
        Self {
            ai_response: ai_response.into(),
        }
    }
}
