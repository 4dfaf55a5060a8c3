//! Demo directory seeding.
//!
//! Populates an empty directory with the demo admin account and five demo
//! students (ET001–ET005), all with the password "password". Gated behind
//! `SEED_DEMO=true`; must never run against a production store.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::password::{self, PasswordError};
use crate::config::Config;
use crate::storage::models::{Account, Role};
use crate::storage::{Database, DatabaseError};

const DEMO_PASSWORD: &str = "password";

const DEMO_STUDENTS: &[(&str, &str, &str)] = &[
    ("ET001", "Alice Johnson", "alice@example.com"),
    ("ET002", "Bob Williams", "bob@example.com"),
    ("ET003", "Charlie Brown", "charlie@example.com"),
    ("ET004", "Diana Prince", "diana@example.com"),
    ("ET005", "Ethan Hunt", "ethan@example.com"),
];

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

/// Seed the demo directory if the store is empty. Returns the number of
/// accounts created (0 when the directory already has accounts).
pub fn seed_demo_directory(db: &Database, config: &Config) -> Result<usize, SeedError> {
    if !db.get_all_accounts()?.is_empty() {
        return Ok(0);
    }

    let now = Utc::now();
    let mut created = 0;

    let admin = Account {
        created_at: now,
        email: config.auth.admin_email.clone(),
        name: "Admin User".to_string(),
        password_hash: password::hash_password(DEMO_PASSWORD)?,
        role: Role::Admin,
        student_id: None,
        uid: Uuid::new_v4().to_string(),
    };
    db.put_account(&admin)?;
    created += 1;

    for (student_id, name, email) in DEMO_STUDENTS {
        let account = Account {
            created_at: now,
            email: (*email).to_string(),
            name: (*name).to_string(),
            password_hash: password::hash_password(DEMO_PASSWORD)?,
            role: Role::Student,
            student_id: Some((*student_id).to_string()),
            uid: Uuid::new_v4().to_string(),
        };
        db.put_account(&account)?;
        created += 1;
    }

    Ok(created)
}
