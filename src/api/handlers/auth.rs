use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::cookies;
use crate::api::response::{ApiError, Success, VerifyResponse};
use crate::directory::{self, CredentialError};
use crate::storage::models::Role;
use crate::tokens::session;
use crate::AppState;

/// The one message every credential/token failure collapses to. Internal
/// distinctions (unknown id vs wrong secret vs signing failure) are logged
/// only.
const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";

const SERVICE_UNAVAILABLE: &str = "Service unavailable. Please try again.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    pub user_type: Role,
}

/// POST /api/login: verify credentials, mint an identity token, and
/// exchange it for the session cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let password = req
        .password
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("password is required"))?;

    let verified = match req.user_type {
        Role::Admin => {
            let email = req
                .email
                .as_deref()
                .ok_or_else(|| ApiError::bad_request("email is required"))?;
            directory::verify_admin(&state.db, &state.config.auth.admin_email, email, password)
        }
        Role::Student => {
            let student_id = req
                .student_id
                .as_deref()
                .ok_or_else(|| ApiError::bad_request("studentId is required"))?;
            directory::verify_student(&state.db, student_id, password)
        }
    };

    let account = match verified {
        Ok(account) => account,
        Err(CredentialError::Unavailable(e)) => {
            tracing::error!(error = %e, "Directory unavailable during login");
            return Err(ApiError::unavailable(SERVICE_UNAVAILABLE));
        }
        Err(e) => {
            tracing::warn!(error = %e, user_type = ?req.user_type, "Login rejected");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let id_token = state.issuer.issue(&account).map_err(|e| {
        tracing::error!(error = %e, uid = %account.uid, "Identity token signing failed");
        ApiError::unauthorized(INVALID_CREDENTIALS)
    })?;

    let ttl = state.config.sessions.session_ttl_seconds;
    let session = session::create(&state.db, &state.issuer, &id_token, ttl).map_err(|e| {
        tracing::error!(error = %e, uid = %account.uid, "Session creation failed");
        ApiError::unauthorized(INVALID_CREDENTIALS)
    })?;

    tracing::debug!(uid = %account.uid, role = ?account.role, "Login succeeded");

    let cookie = cookies::session_cookie(
        &session.token,
        ttl,
        state.config.sessions.secure_cookies,
    );
    Ok(([(header::SET_COOKIE, cookie)], Success::json()))
}

/// POST /api/logout: destroy the session and clear the cookie. Succeeds
/// even without a cookie.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = cookies::session_token(&headers) {
        match session::destroy(&state.db, &token) {
            Ok(destroyed) => {
                if destroyed {
                    tracing::debug!("Session destroyed on logout");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to destroy session on logout");
                return Err(ApiError::internal("Failed to log out"));
            }
        }
    }

    let cookie = cookies::clear_session_cookie(state.config.sessions.secure_cookies);
    Ok(([(header::SET_COOKIE, cookie)], Success::json()))
}

/// GET /api/auth/verify: resolve the session cookie to a principal.
/// Verification failures are a 401 with `{"user": null}`, never an error.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user = match cookies::session_token(&headers) {
        None => None,
        Some(token) => match session::verify(&state.db, &token) {
            Ok(principal) => principal,
            Err(e) => {
                tracing::warn!(error = %e, "Session verification failed");
                None
            }
        },
    };

    match user {
        Some(principal) => (
            StatusCode::OK,
            Json(VerifyResponse {
                user: Some(principal),
            }),
        ),
        None => (StatusCode::UNAUTHORIZED, Json(VerifyResponse { user: None })),
    }
}
