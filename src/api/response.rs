use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::storage::models::Principal;

// ============================================================================
// Wire envelopes
// ============================================================================

/// `{"success": true}`, the login and logout success body
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn json() -> Json<Success> {
        Json(Success { success: true })
    }
}

/// `{"error": "..."}`, every failure body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"user": Principal | null}`, the verify endpoint body
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub user: Option<Principal>,
}

// ============================================================================
// Unified error type for handlers
// ============================================================================

/// An API error that is either a fail (4xx, expected) or an error (5xx).
/// The split decides log severity; both serialize as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    Error(StatusCode, String),
    Fail(StatusCode, String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Fail(status, message) => (status, message),
            ApiError::Error(status, message) => {
                tracing::error!(status = %status, message = %message, "Request failed");
                (status, message)
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::UNAUTHORIZED, message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::FORBIDDEN, message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::NOT_FOUND, message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::CONFLICT, message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        ApiError::Error(StatusCode::SERVICE_UNAVAILABLE, message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Error(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }
}
