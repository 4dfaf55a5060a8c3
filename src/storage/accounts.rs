use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::Account;
use super::tables::*;

impl Database {
    /// Store an account, maintaining the email and student-id indexes
    pub fn put_account(&self, account: &Account) -> Result<(), DatabaseError> {
        debug_assert!(!account.uid.is_empty(), "account uid must not be empty");
        debug_assert!(!account.email.is_empty(), "account email must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(ACCOUNTS)?;
            let data = rmp_serde::to_vec_named(account)?;
            table.insert(account.uid.as_str(), data.as_slice())?;

            let mut email_table = write_txn.open_table(ACCOUNT_EMAILS)?;
            let email = account.email.to_lowercase();
            email_table.insert(email.as_str(), account.uid.as_str())?;

            if let Some(student_id) = &account.student_id {
                let mut id_table = write_txn.open_table(STUDENT_IDS)?;
                id_table.insert(student_id.as_str(), account.uid.as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get an account by uid
    pub fn get_account(&self, uid: &str) -> Result<Option<Account>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;

        match table.get(uid)? {
            Some(data) => {
                let account: Account = rmp_serde::from_slice(data.value())?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    /// Get an account by email (case-insensitive)
    pub fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        let uid: Option<String> = {
            let read_txn = self.begin_read()?;
            let table = read_txn.open_table(ACCOUNT_EMAILS)?;
            table
                .get(email.to_lowercase().as_str())?
                .map(|v| v.value().to_string())
        };

        match uid {
            Some(uid) => self.get_account(&uid),
            None => Ok(None),
        }
    }

    /// Get an account by its student id
    pub fn get_account_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Option<Account>, DatabaseError> {
        let uid: Option<String> = {
            let read_txn = self.begin_read()?;
            let table = read_txn.open_table(STUDENT_IDS)?;
            table.get(student_id)?.map(|v| v.value().to_string())
        };

        match uid {
            Some(uid) => self.get_account(&uid),
            None => Ok(None),
        }
    }

    /// Delete an account by uid, cleaning up both indexes
    pub fn delete_account(&self, uid: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let account: Option<Account> = {
            let table = write_txn.open_table(ACCOUNTS)?;
            let result = table.get(uid)?;
            match result {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            }
        };

        let deleted = match account {
            Some(account) => {
                {
                    let mut table = write_txn.open_table(ACCOUNTS)?;
                    table.remove(uid)?;
                }
                {
                    let mut email_table = write_txn.open_table(ACCOUNT_EMAILS)?;
                    let email = account.email.to_lowercase();
                    email_table.remove(email.as_str())?;
                }
                if let Some(student_id) = &account.student_id {
                    let mut id_table = write_txn.open_table(STUDENT_IDS)?;
                    id_table.remove(student_id.as_str())?;
                }
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(deleted)
    }

    /// Get all accounts (for listing and seeding checks)
    pub fn get_all_accounts(&self) -> Result<Vec<Account>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;

        let mut accounts = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let account: Account = rmp_serde::from_slice(value.value())?;
            accounts.push(account);
        }

        Ok(accounts)
    }
}
