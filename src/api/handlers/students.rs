//! Student directory administration.
//!
//! `/api` paths are exempt from the page route guard, so these handlers
//! check for an admin session themselves before touching the directory.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::cookies;
use crate::api::response::{ApiError, Success};
use crate::directory::password;
use crate::storage::models::{Account, Principal, Role};
use crate::tokens::session;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub student_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub created_at: String,
    pub email: String,
    pub name: String,
    pub student_id: String,
    pub uid: String,
}

/// POST /api/students
pub async fn create_student(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    require_admin(&state, &headers)?;
    validate_create_student(&req)?;

    let exists = state
        .db
        .get_account_by_student_id(&req.student_id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .is_some()
        || state
            .db
            .get_account_by_email(&req.email)
            .map_err(|e| ApiError::internal(e.to_string()))?
            .is_some();
    if exists {
        return Err(ApiError::conflict(
            "A student with this id or email already exists",
        ));
    }

    let password_hash = password::hash_password(&req.password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {e}")))?;

    let account = Account {
        created_at: Utc::now(),
        email: req.email.clone(),
        name: req.name.clone(),
        password_hash,
        role: Role::Student,
        student_id: Some(req.student_id.clone()),
        uid: Uuid::new_v4().to_string(),
    };

    state
        .db
        .put_account(&account)
        .map_err(|e| ApiError::internal(format!("Failed to store account: {e}")))?;

    tracing::debug!(uid = %account.uid, student_id = %req.student_id, "Created student account");

    Ok((StatusCode::CREATED, Json(student_to_response(&account))))
}

/// GET /api/students
pub async fn list_students(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    require_admin(&state, &headers)?;

    let accounts = state
        .db
        .get_all_accounts()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(
        accounts
            .iter()
            .filter(|a| a.role == Role::Student)
            .map(student_to_response)
            .collect(),
    ))
}

/// GET /api/students/:student_id
pub async fn get_student(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(student_id): Path<String>,
) -> Result<Json<StudentResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let account = state
        .db
        .get_account_by_student_id(&student_id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    Ok(Json(student_to_response(&account)))
}

/// DELETE /api/students/:student_id: deletes the account and revokes every
/// session it holds.
pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(student_id): Path<String>,
) -> Result<Json<Success>, ApiError> {
    require_admin(&state, &headers)?;

    let account = state
        .db
        .get_account_by_student_id(&student_id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let revoked = state
        .db
        .delete_sessions_by_subject(&account.uid)
        .map_err(|e| ApiError::internal(format!("Failed to revoke sessions: {e}")))?;

    state
        .db
        .delete_account(&account.uid)
        .map_err(|e| ApiError::internal(format!("Failed to delete account: {e}")))?;

    tracing::debug!(uid = %account.uid, student_id = %student_id, sessions_revoked = revoked, "Deleted student account");

    Ok(Success::json())
}

// ============================================================================
// Helpers
// ============================================================================

/// Resolve the caller's session and require the admin role. Store failures
/// deny access rather than letting the request through.
fn require_admin(state: &Arc<AppState>, headers: &HeaderMap) -> Result<Principal, ApiError> {
    let token = cookies::session_token(headers)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    match session::verify(&state.db, &token) {
        Ok(Some(principal)) if principal.role == Role::Admin => Ok(principal),
        Ok(Some(_)) => Err(ApiError::forbidden("Admin access required")),
        Ok(None) => Err(ApiError::unauthorized("Authentication required")),
        Err(e) => {
            tracing::error!(error = %e, "Session verification failed");
            Err(ApiError::unavailable("Service unavailable. Please try again."))
        }
    }
}

fn validate_create_student(req: &CreateStudentRequest) -> Result<(), ApiError> {
    if req.student_id.trim().is_empty() {
        return Err(ApiError::bad_request("studentId is required"));
    }
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    if !req.email.contains('@') {
        return Err(ApiError::bad_request("email is not valid"));
    }
    if req.password.len() < 8 {
        return Err(ApiError::bad_request(
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}

fn student_to_response(account: &Account) -> StudentResponse {
    StudentResponse {
        created_at: account.created_at.to_rfc3339(),
        email: account.email.clone(),
        name: account.name.clone(),
        student_id: account.student_id.clone().unwrap_or_default(),
        uid: account.uid.clone(),
    }
}
