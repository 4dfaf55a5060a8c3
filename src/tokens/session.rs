//! Session manager.
//!
//! Exchanges a verified identity token for a long-lived opaque session token
//! persisted in the store, and verifies session tokens back into principals.
//! Verification failure is `Ok(None)`, never an error the caller should show
//! to a user; a store-backed artifact also makes revocation immediate.

use chrono::{Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::generator::generate_hex;
use super::issuer::{TokenError, TokenIssuer};
use crate::storage::models::{Principal, SessionRecord};
use crate::storage::{Database, DatabaseError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Identity token rejected: {0}")]
    TokenInvalid(#[from] TokenError),
}

/// Exchange an identity token for a new session
pub fn create(
    db: &Database,
    issuer: &TokenIssuer,
    id_token: &str,
    ttl_seconds: u64,
) -> Result<SessionRecord, SessionError> {
    let claims = issuer.verify(id_token)?;

    let now = Utc::now();
    let session = SessionRecord {
        claims: claims.role,
        created_at: now,
        expires_at: now + Duration::seconds(ttl_seconds as i64),
        id: Uuid::new_v4().to_string(),
        token: generate_hex(32),
        uid: claims.sub,
    };

    db.put_session(&session)?;
    tracing::debug!(id = %session.id, uid = %session.uid, "Created session");
    Ok(session)
}

/// Verify a session token, returning the principal it authenticates.
///
/// Returns `None` for unknown tokens, expired sessions (deleted on sight),
/// and sessions whose account no longer exists. The caller cannot tell
/// these apart.
pub fn verify(db: &Database, token: &str) -> Result<Option<Principal>, SessionError> {
    let session = match db.get_session(token)? {
        Some(session) => session,
        None => return Ok(None),
    };

    if session.is_expired_at(Utc::now()) {
        if let Err(e) = db.delete_session(token) {
            tracing::warn!(id = %session.id, error = %e, "Failed to delete expired session");
        }
        tracing::debug!(id = %session.id, "Session expired");
        return Ok(None);
    }

    let account = match db.get_account(&session.uid)? {
        Some(account) => account,
        None => {
            // Account deleted since login; the session dies with it
            if let Err(e) = db.delete_session(token) {
                tracing::warn!(id = %session.id, error = %e, "Failed to delete orphaned session");
            }
            return Ok(None);
        }
    };

    Ok(Some(Principal::from_claims(&session.claims, &account)))
}

/// Destroy a session. No-op (returns false) if the token is unknown.
pub fn destroy(db: &Database, token: &str) -> Result<bool, SessionError> {
    Ok(db.delete_session(token)?)
}

/// Clean up expired sessions (called by the background task)
pub fn cleanup_expired(db: &Database) -> Result<usize, SessionError> {
    let cleaned = db.delete_expired_sessions()?;
    if cleaned > 0 {
        tracing::info!(count = cleaned, "Cleaned up expired sessions");
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::Role;
    use crate::testutil::{insert_student, make_session, setup_db, test_issuer};

    #[test]
    fn test_create_then_verify_returns_matching_principal() {
        let (db, _temp) = setup_db();
        let issuer = test_issuer();
        let account = insert_student(&db, "ET001", "password");

        let id_token = issuer.issue(&account).unwrap();
        let session = create(&db, &issuer, &id_token, 432_000).unwrap();

        let principal = verify(&db, &session.token).unwrap().unwrap();
        assert_eq!(principal.uid, account.uid);
        assert_eq!(principal.role, Role::Student);
        assert_eq!(principal.student_id.as_deref(), Some("ET001"));
    }

    #[test]
    fn test_create_rejects_bad_identity_token() {
        let (db, _temp) = setup_db();
        let issuer = test_issuer();

        let err = create(&db, &issuer, "not-a-token", 432_000).unwrap_err();
        assert!(matches!(err, SessionError::TokenInvalid(_)));
    }

    #[test]
    fn test_expired_session_verifies_to_none() {
        let (db, _temp) = setup_db();
        let account = insert_student(&db, "ET001", "password");

        let mut session = make_session("s1", &account.uid);
        session.expires_at = Utc::now() - Duration::minutes(1);
        db.put_session(&session).unwrap();

        assert!(verify(&db, &session.token).unwrap().is_none());
        // Deleted on sight
        assert!(db.get_session(&session.token).unwrap().is_none());
    }

    #[test]
    fn test_destroyed_session_verifies_to_none() {
        let (db, _temp) = setup_db();
        let issuer = test_issuer();
        let account = insert_student(&db, "ET001", "password");

        let id_token = issuer.issue(&account).unwrap();
        let session = create(&db, &issuer, &id_token, 432_000).unwrap();

        assert!(destroy(&db, &session.token).unwrap());
        assert!(verify(&db, &session.token).unwrap().is_none());

        // Destroy is a no-op when the token is already gone
        assert!(!destroy(&db, &session.token).unwrap());
    }

    #[test]
    fn test_session_of_deleted_account_verifies_to_none() {
        let (db, _temp) = setup_db();
        let issuer = test_issuer();
        let account = insert_student(&db, "ET001", "password");

        let id_token = issuer.issue(&account).unwrap();
        let session = create(&db, &issuer, &id_token, 432_000).unwrap();

        db.delete_account(&account.uid).unwrap();
        assert!(verify(&db, &session.token).unwrap().is_none());
    }

    #[test]
    fn test_principal_role_comes_from_session_claim() {
        let (db, _temp) = setup_db();
        let issuer = test_issuer();
        let mut account = insert_student(&db, "ET001", "password");

        let id_token = issuer.issue(&account).unwrap();
        let session = create(&db, &issuer, &id_token, 432_000).unwrap();

        // A role change after login does not retroactively upgrade the
        // session; the claim fixed at issue time governs
        account.role = Role::Admin;
        db.put_account(&account).unwrap();

        let principal = verify(&db, &session.token).unwrap().unwrap();
        assert_eq!(principal.role, Role::Student);
    }

    #[test]
    fn test_unknown_token_verifies_to_none() {
        let (db, _temp) = setup_db();
        assert!(verify(&db, "no-such-token").unwrap().is_none());
    }

    #[test]
    fn test_cleanup_expired() {
        let (db, _temp) = setup_db();

        let mut expired = make_session("s1", "uid-1");
        expired.expires_at = Utc::now() - Duration::minutes(1);
        db.put_session(&expired).unwrap();
        db.put_session(&make_session("s2", "uid-1")).unwrap();

        assert_eq!(cleanup_expired(&db).unwrap(), 1);
    }
}
