use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account type, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

/// The role claim embedded in identity tokens and session records.
///
/// A tagged union rather than an open-ended claim bag: student sessions
/// always carry the directory record they resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleClaim {
    Admin,
    Student { student_record_id: String },
}

impl RoleClaim {
    pub fn role(&self) -> Role {
        match self {
            RoleClaim::Admin => Role::Admin,
            RoleClaim::Student { .. } => Role::Student,
        }
    }
}

/// An account in the user directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// When the account was created
    pub created_at: DateTime<Utc>,
    pub email: String,
    /// Display name
    pub name: String,
    /// Argon2 PHC hash of the secret (never the plaintext)
    pub password_hash: String,
    pub role: Role,
    /// Human-facing student id (e.g. "ET001"); None for admin accounts
    pub student_id: Option<String>,
    /// Opaque identifier, primary key
    pub uid: String,
}

impl Account {
    pub fn role_claim(&self) -> RoleClaim {
        match self.role {
            Role::Admin => RoleClaim::Admin,
            Role::Student => RoleClaim::Student {
                student_record_id: self.uid.clone(),
            },
        }
    }
}

/// A persisted session, keyed by its opaque token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Role claim carried over from the identity token the session was
    /// exchanged for
    pub claims: RoleClaim,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Non-secret UUID identifier
    pub id: String,
    /// Opaque secret token (32-byte hex), stored in the `__session` cookie
    pub token: String,
    /// The account this session belongs to
    pub uid: String,
}

impl SessionRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// An authenticated identity, produced by session verification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(rename = "studentId", skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    pub uid: String,
}

impl Principal {
    /// Join a session's role claim with the live account record: the role is
    /// the one fixed at login, the display fields are current.
    pub fn from_claims(claims: &RoleClaim, account: &Account) -> Self {
        Self {
            email: account.email.clone(),
            name: account.name.clone(),
            role: claims.role(),
            student_id: account.student_id.clone(),
            uid: account.uid.clone(),
        }
    }
}
