use http::StatusCode;
use thiserror::Error;

pub const MISSING_HISTORY: &str = "Missing conversation history";
pub const MISSING_SYSTEM_PROMPT: &str = "Missing system prompt";
pub const MISSING_TURN_TEXT: &str = "Conversation turn is missing text";
pub const INVALID_BODY: &str = "Invalid request body";

const UNREACHABLE_MSG: &str = "Could not connect to the AI engine. Is it running?";
const UPSTREAM_STATUS_MSG: &str = "Failed to connect to the AI service.";
const MALFORMED_MSG: &str = "Invalid response from the AI service.";
const INTERNAL_MSG: &str = "An internal server error occurred.";

/// Everything that can go wrong while relaying a conversation. Each
/// variant maps to a fixed status code and a fixed public message so
/// clients can rely on them. The wrapped details are only logged.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("provider unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("provider response malformed: {0}")]
    Malformed(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message returned to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::Validation(msg) => *msg,
            RelayError::Unreachable(_) => UNREACHABLE_MSG,
            RelayError::UpstreamStatus { .. } => UPSTREAM_STATUS_MSG,
            RelayError::Malformed(_) => MALFORMED_MSG,
            RelayError::Internal(_) => INTERNAL_MSG,
        }
    }

    /// Short name used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Validation(_) => "validation",
            RelayError::Unreachable(_) => "upstream_unavailable",
            RelayError::UpstreamStatus { .. } => "upstream_unavailable",
            RelayError::Malformed(_) => "upstream_malformed",
            RelayError::Internal(_) => "internal",
        }
    }
}
