use redb::TableDefinition;

/// Accounts: uid -> Account (msgpack)
pub const ACCOUNTS: TableDefinition<&str, &[u8]> = TableDefinition::new("accounts");

/// Secondary index: lowercased email -> uid
pub const ACCOUNT_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("account_emails");

/// Secondary index: student_id -> uid
pub const STUDENT_IDS: TableDefinition<&str, &str> = TableDefinition::new("student_ids");

/// Sessions: opaque token -> SessionRecord (msgpack)
pub const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Secondary index: uid -> Vec<token> (for revoking all of a subject's sessions)
pub const SUBJECT_SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("subject_sessions");

/// Expiration index: zero-padded expiry millis + token -> token
pub const SESSION_EXPIRY: TableDefinition<&str, &str> = TableDefinition::new("session_expiry");
