//! The user directory: account lookup and credential verification.
//!
//! The verifier is the only component that ever sees a plaintext secret.
//! Secrets are stored as Argon2 hashes; lookup failures and mismatches are
//! distinguished internally (`NotFound` vs `InvalidCredential`) but the API
//! layer collapses both into a single user-facing message.

pub mod password;
pub mod seed;

use thiserror::Error;

use crate::storage::models::{Account, Role};
use crate::storage::{Database, DatabaseError};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Secret does not match")]
    InvalidCredential,
    #[error("No account matches the supplied identifier")]
    NotFound,
    #[error("Directory unavailable: {0}")]
    Unavailable(#[from] DatabaseError),
}

/// Verify admin credentials. The admin identifier is the fixed configured
/// email; anything else is `NotFound` before the directory is even consulted.
pub fn verify_admin(
    db: &Database,
    admin_email: &str,
    email: &str,
    password: &str,
) -> Result<Account, CredentialError> {
    if !email.eq_ignore_ascii_case(admin_email) {
        return Err(CredentialError::NotFound);
    }

    let account = db
        .get_account_by_email(admin_email)?
        .ok_or(CredentialError::NotFound)?;

    if account.role != Role::Admin {
        return Err(CredentialError::NotFound);
    }

    check_password(account, password)
}

/// Verify student credentials, resolving the student id to an account record.
pub fn verify_student(
    db: &Database,
    student_id: &str,
    password: &str,
) -> Result<Account, CredentialError> {
    let account = db
        .get_account_by_student_id(student_id)?
        .ok_or(CredentialError::NotFound)?;

    if account.role != Role::Student {
        return Err(CredentialError::NotFound);
    }

    check_password(account, password)
}

fn check_password(account: Account, password: &str) -> Result<Account, CredentialError> {
    match password::verify_password(password, &account.password_hash) {
        Ok(true) => Ok(account),
        Ok(false) => Err(CredentialError::InvalidCredential),
        Err(e) => {
            tracing::error!(uid = %account.uid, error = %e, "Stored password hash is unusable");
            Err(CredentialError::InvalidCredential)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{insert_student, setup_db, DEMO_ADMIN_EMAIL};

    #[test]
    fn test_verify_student_ok() {
        let (db, _temp) = setup_db();
        let account = insert_student(&db, "ET001", "password");

        let verified = verify_student(&db, "ET001", "password").unwrap();
        assert_eq!(verified.uid, account.uid);
        assert_eq!(verified.role, Role::Student);
    }

    #[test]
    fn test_verify_student_wrong_password() {
        let (db, _temp) = setup_db();
        insert_student(&db, "ET001", "password");

        let err = verify_student(&db, "ET001", "letmein").unwrap_err();
        assert!(matches!(err, CredentialError::InvalidCredential));
    }

    #[test]
    fn test_verify_student_unknown_id() {
        let (db, _temp) = setup_db();
        insert_student(&db, "ET001", "password");

        let err = verify_student(&db, "ET999", "password").unwrap_err();
        assert!(matches!(err, CredentialError::NotFound));
    }

    #[test]
    fn test_verify_admin_requires_fixed_email() {
        let (db, _temp) = setup_db();
        crate::testutil::insert_admin(&db, "password");

        assert!(verify_admin(&db, DEMO_ADMIN_EMAIL, DEMO_ADMIN_EMAIL, "password").is_ok());

        // Case-insensitive match on the configured email
        assert!(verify_admin(&db, DEMO_ADMIN_EMAIL, "Admin@EduTraq.com", "password").is_ok());

        let err =
            verify_admin(&db, DEMO_ADMIN_EMAIL, "other@edutraq.com", "password").unwrap_err();
        assert!(matches!(err, CredentialError::NotFound));
    }

    #[test]
    fn test_student_cannot_log_in_as_admin() {
        let (db, _temp) = setup_db();
        let student = insert_student(&db, "ET001", "password");

        let err =
            verify_admin(&db, &student.email, &student.email, "password").unwrap_err();
        assert!(matches!(err, CredentialError::NotFound));
    }
}
