//! Error types for the HTTP service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

/// Relay handler errors with HTTP status code mapping
///
/// Only failures of the request itself reach the caller. Failures *past*
/// target resolution and envelope parsing (unrecognized shapes, unusable
/// payloads, downstream delivery errors) are deliberately not represented
/// here: the event source is not responsible for them, and surfacing them
/// would invite retry storms from upstream. Those cases log, count, and
/// return `200`.
#[derive(Debug, thiserror::Error)]
pub enum RelayHandlerError {
    /// The routing token did not resolve to a configured destination
    ///
    /// Maps to: `400 Bad Request` with the fixed body
    /// `{"status":400,"message":"Unknown webhook target."}`, which is a
    /// wire contract with existing callers.
    #[error("Unknown webhook target: {target}")]
    UnknownTarget { target: String },

    /// The request body was not a parseable event envelope
    ///
    /// Maps to: `400 Bad Request` (permanent error, do not retry)
    #[error("Malformed event payload: {message}")]
    MalformedRequest { message: String },
}

impl IntoResponse for RelayHandlerError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::UnknownTarget { .. } => serde_json::json!({
                "status": 400,
                "message": "Unknown webhook target.",
            }),
            Self::MalformedRequest { .. } => serde_json::json!({
                "status": 400,
                "message": self.to_string(),
            }),
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
