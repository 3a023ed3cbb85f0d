use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::config::AGENT_API_URL_ENV;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Failures surfaced by the relay. Every variant maps to a 500 `{ "error" }` body.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{} environment variable not configured", AGENT_API_URL_ENV)]
    Configuration,
    #[error("ELIZA API error: {0}")]
    Downstream(String),
    #[error("{0}")]
    Unexpected(String),
}

impl RelayError {
    /// Wrap any failure message, falling back to a generic one when it is empty.
    pub fn unexpected(message: impl std::fmt::Display) -> Self {
        let message = message.to_string();
        if message.trim().is_empty() {
            RelayError::Unexpected(UNKNOWN_ERROR.to_string())
        } else {
            RelayError::Unexpected(message)
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match &self {
            RelayError::Configuration => warn!("Relay rejected: {}", message),
            _ => error!("Error processing message: {}", message),
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::unexpected(err)
    }
}
