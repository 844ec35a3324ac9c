//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::relay::RelayError;

// Errors

/// Every error response has the same shape: `{"error": "..."}`
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

pub struct ApiError(anyhow::Error);

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        // Details stay in the logs
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal server error occurred.",
        )
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::Validation(msg) => {
                tracing::warn!(kind = self.kind(), "Rejected request: {}", msg)
            }
            _ => tracing::error!(kind = self.kind(), error = %self, "Relay failed"),
        }

        error_response(self.status(), self.public_message())
    }
}

// Re-export public types from each route

pub mod interact {
    pub use crate::api::routes::interact::public::*;
}

pub mod sessions {
    pub use crate::api::routes::sessions::public::*;
}

pub mod summary {
    pub use crate::api::routes::summary::public::*;
}
