use redb::ReadableTable;

use super::db::{expiry_key, Database, DatabaseError};
use super::models::SessionRecord;
use super::tables::*;

impl Database {
    /// Store a session record
    pub fn put_session(&self, session: &SessionRecord) -> Result<(), DatabaseError> {
        debug_assert!(!session.token.is_empty(), "session token must not be empty");
        debug_assert!(!session.uid.is_empty(), "session uid must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSIONS)?;
            let data = rmp_serde::to_vec_named(session)?;
            table.insert(session.token.as_str(), data.as_slice())?;

            // Update subject_sessions index
            let mut index_table = write_txn.open_table(SUBJECT_SESSIONS)?;
            let mut tokens: Vec<String> = index_table
                .get(session.uid.as_str())?
                .map(|v| rmp_serde::from_slice(v.value()))
                .transpose()?
                .unwrap_or_default();

            if !tokens.contains(&session.token) {
                tokens.push(session.token.clone());
                let index_data = rmp_serde::to_vec_named(&tokens)?;
                index_table.insert(session.uid.as_str(), index_data.as_slice())?;
            }

            // Update expiration index
            let mut expiry_table = write_txn.open_table(SESSION_EXPIRY)?;
            let ek = expiry_key(&session.expires_at, &session.token);
            expiry_table.insert(ek.as_str(), session.token.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a session by its secret token value
    pub fn get_session(&self, token: &str) -> Result<Option<SessionRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(SESSIONS)?;

        match table.get(token)? {
            Some(data) => {
                let session: SessionRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// Delete a session by its secret token value
    pub fn delete_session(&self, token: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        // First, get the session for index cleanup
        let session: Option<SessionRecord> = {
            let table = write_txn.open_table(SESSIONS)?;
            let result = table.get(token)?;
            match result {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            }
        };

        let deleted = match session {
            Some(session) => {
                {
                    let mut table = write_txn.open_table(SESSIONS)?;
                    table.remove(token)?;
                }

                // Update subject_sessions index
                let tokens: Option<Vec<String>> = {
                    let index_table = write_txn.open_table(SUBJECT_SESSIONS)?;
                    let result = index_table.get(session.uid.as_str())?;
                    match result {
                        Some(data) => Some(rmp_serde::from_slice(data.value())?),
                        None => None,
                    }
                };

                if let Some(mut t) = tokens {
                    t.retain(|v| v != token);
                    let mut index_table = write_txn.open_table(SUBJECT_SESSIONS)?;
                    if t.is_empty() {
                        index_table.remove(session.uid.as_str())?;
                    } else {
                        let new_index_data = rmp_serde::to_vec_named(&t)?;
                        index_table.insert(session.uid.as_str(), new_index_data.as_slice())?;
                    }
                }

                // Remove from expiration index
                {
                    let mut expiry_table = write_txn.open_table(SESSION_EXPIRY)?;
                    let ek = expiry_key(&session.expires_at, token);
                    expiry_table.remove(ek.as_str())?;
                }

                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(deleted)
    }

    /// Get all live session tokens for a subject
    pub fn get_sessions_by_subject(
        &self,
        uid: &str,
    ) -> Result<Vec<SessionRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let index_table = read_txn.open_table(SUBJECT_SESSIONS)?;
        let sessions_table = read_txn.open_table(SESSIONS)?;

        let tokens: Vec<String> = match index_table.get(uid)? {
            Some(data) => rmp_serde::from_slice(data.value())?,
            None => return Ok(Vec::new()),
        };

        let mut sessions = Vec::new();
        for token in tokens {
            if let Some(data) = sessions_table.get(token.as_str())? {
                let session: SessionRecord = rmp_serde::from_slice(data.value())?;
                sessions.push(session);
            }
        }

        Ok(sessions)
    }

    /// Delete every session belonging to a subject, returning the count
    pub fn delete_sessions_by_subject(&self, uid: &str) -> Result<usize, DatabaseError> {
        let sessions = self.get_sessions_by_subject(uid)?;
        let mut deleted = 0;
        for session in &sessions {
            if self.delete_session(&session.token)? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Delete expired sessions using the expiration index (no full table scan).
    pub fn delete_expired_sessions(&self) -> Result<usize, DatabaseError> {
        let now_ms = chrono::Utc::now().timestamp_millis();

        // Phase 1: read the expiration index to collect expired entries
        let expired: Vec<String> = {
            let read_txn = self.begin_read()?;
            let table = read_txn.open_table(SESSION_EXPIRY)?;
            let mut result = Vec::new();
            for entry in table.iter()? {
                let (key, value) = entry?;
                match super::db::expiry_key_ms(key.value()) {
                    Some(ms) if ms <= now_ms => {
                        result.push(value.value().to_string());
                    }
                    _ => break,
                }
            }
            result
        };

        // Phase 2: delete each expired session with full index cleanup
        let mut deleted = 0;
        for token in &expired {
            if self.delete_session(token)? {
                deleted += 1;
            }
        }

        Ok(deleted)
    }
}
