//! JSON error responses for the HTTP shell.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ChatbotError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. "routing_failure".
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// 400
    BadRequest(String),
    /// 404
    NotFound(String),
    /// 500
    Internal(String),
    /// 502: the model named an unknown tool or looped past the round limit.
    RoutingFailure(String),
    /// 503: model, embedding, or network failure.
    CapabilityUnavailable(String),
    /// 504
    Timeout(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            ApiError::RoutingFailure(msg) => (StatusCode::BAD_GATEWAY, "routing_failure", msg),
            ApiError::CapabilityUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "capability_unavailable",
                msg,
            ),
            ApiError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "timeout", msg),
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChatbotError> for ApiError {
    fn from(err: ChatbotError) -> Self {
        match &err {
            ChatbotError::Timeout => ApiError::Timeout(err.to_string()),
            e if e.is_routing_failure() => ApiError::RoutingFailure(err.to_string()),
            e if e.is_capability_failure() => ApiError::CapabilityUnavailable(err.to_string()),
            ChatbotError::ConfigError(msg) => ApiError::BadRequest(msg.clone()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}
