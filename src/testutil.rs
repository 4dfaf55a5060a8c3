//! Shared test helpers, available to all `#[cfg(test)]` modules in the crate.

use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

use crate::config::{AuthConfig, Config, NodeConfig, SessionConfig};
use crate::directory::password;
use crate::guard::RouteTable;
use crate::storage::models::{Account, Role, RoleClaim, SessionRecord};
use crate::storage::Database;
use crate::tokens::TokenIssuer;
use crate::AppState;

pub const DEMO_ADMIN_EMAIL: &str = "admin@edutraq.com";

const TEST_SECRET: &str = "test-secret-0123456789abcdef0123456789abcdef";

/// Open a fresh database in a temporary directory.
///
/// Returns both the `Database` and the `TempDir` guard; the caller must
/// keep the `TempDir` alive for the duration of the test.
pub fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path()).unwrap();
    (db, temp_dir)
}

/// A minimal `Config` suitable for unit tests.
pub fn test_config() -> Config {
    Config {
        auth: AuthConfig {
            admin_email: DEMO_ADMIN_EMAIL.to_string(),
            identity_token_ttl_seconds: 300,
            token_secret: TEST_SECRET.to_string(),
        },
        node: NodeConfig {
            bind_address: "127.0.0.1:8080".to_string(),
            data_dir: "/tmp/test".to_string(),
        },
        routes: RouteTable::default(),
        seed_demo: false,
        sessions: SessionConfig::default(),
    }
}

/// A `TokenIssuer` built from the test secret.
pub fn test_issuer() -> TokenIssuer {
    TokenIssuer::new(TEST_SECRET, 300)
}

/// Build a full `Arc<AppState>` around the given database.
pub fn test_state(db: Database) -> Arc<AppState> {
    Arc::new(AppState {
        config: test_config(),
        db,
        issuer: test_issuer(),
    })
}

/// Create a student `Account` with a hashed "password" secret.
pub fn make_student_account(uid: &str, student_id: &str, name: &str) -> Account {
    Account {
        created_at: Utc::now(),
        email: format!("{}@example.com", student_id.to_lowercase()),
        name: name.to_string(),
        password_hash: password::hash_password("password").unwrap(),
        role: Role::Student,
        student_id: Some(student_id.to_string()),
        uid: uid.to_string(),
    }
}

/// Create the admin `Account` with a hashed "password" secret.
pub fn make_admin_account() -> Account {
    Account {
        created_at: Utc::now(),
        email: DEMO_ADMIN_EMAIL.to_string(),
        name: "Admin User".to_string(),
        password_hash: password::hash_password("password").unwrap(),
        role: Role::Admin,
        student_id: None,
        uid: "admin-uid".to_string(),
    }
}

/// Insert a student account with the given id and secret, returning it.
pub fn insert_student(db: &Database, student_id: &str, secret: &str) -> Account {
    let account = Account {
        created_at: Utc::now(),
        email: format!("{}@example.com", student_id.to_lowercase()),
        name: format!("Student {student_id}"),
        password_hash: password::hash_password(secret).unwrap(),
        role: Role::Student,
        student_id: Some(student_id.to_string()),
        uid: Uuid::new_v4().to_string(),
    };
    db.put_account(&account).unwrap();
    account
}

/// Insert the admin account with the given secret, returning it.
pub fn insert_admin(db: &Database, secret: &str) -> Account {
    let account = Account {
        created_at: Utc::now(),
        email: DEMO_ADMIN_EMAIL.to_string(),
        name: "Admin User".to_string(),
        password_hash: password::hash_password(secret).unwrap(),
        role: Role::Admin,
        student_id: None,
        uid: Uuid::new_v4().to_string(),
    };
    db.put_account(&account).unwrap();
    account
}

/// Create a `SessionRecord` with the given id and subject, expiring in a day.
pub fn make_session(id: &str, uid: &str) -> SessionRecord {
    let now = Utc::now();
    SessionRecord {
        claims: RoleClaim::Student {
            student_record_id: uid.to_string(),
        },
        created_at: now,
        expires_at: now + chrono::Duration::hours(24),
        id: id.to_string(),
        token: format!("tok_{id}"),
        uid: uid.to_string(),
    }
}
