//! Request-terminal webhook errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failure while decoding, dispatching, or encoding one webhook call.
/// Every variant ends the request with HTTP 500 and a plain-text `ERROR: <detail>` body.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("invalid request body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Unknown tag: {0}")]
    UnknownTag(String),
    #[error("encoding response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        log::warn!("webhook: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("ERROR: {}", self)).into_response()
    }
}
