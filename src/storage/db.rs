use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use redb::{Database as RedbDatabase, ReadTransaction, WriteTransaction};
use thiserror::Error;

use super::tables::*;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("Decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("Encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),
    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),
    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),
}

#[derive(Clone)]
pub struct Database {
    db: Arc<RedbDatabase>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join("edutraq-auth.redb");
        let db = RedbDatabase::create(db_path)?;

        // Create tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(ACCOUNT_EMAILS)?;
            let _ = write_txn.open_table(STUDENT_IDS)?;
            let _ = write_txn.open_table(SESSIONS)?;
            let _ = write_txn.open_table(SUBJECT_SESSIONS)?;
            let _ = write_txn.open_table(SESSION_EXPIRY)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a read transaction
    pub fn begin_read(&self) -> Result<ReadTransaction, DatabaseError> {
        Ok(self.db.begin_read()?)
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> Result<WriteTransaction, DatabaseError> {
        Ok(self.db.begin_write()?)
    }
}

/// Key for the expiration index: zero-padded millis so that lexicographic
/// order is chronological order, with the token as a uniqueness suffix.
pub fn expiry_key(expires_at: &DateTime<Utc>, token: &str) -> String {
    format!("{:020}:{token}", expires_at.timestamp_millis())
}

/// Extract the expiry millis from an expiration index key
pub fn expiry_key_ms(key: &str) -> Option<i64> {
    key.split(':').next()?.parse().ok()
}
