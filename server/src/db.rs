//! Contact message storage.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use thiserror::Error;

use crate::contact::ContactSubmission;

/// Errors that can occur during storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Connection wrapper owning the `contact_messages` table.
pub struct MessageStore {
    conn: Mutex<Connection>,
}

impl MessageStore {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    /// Open a fresh in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS contact_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                subject TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert a submission, returning its row id.
    pub fn insert(&self, submission: &ContactSubmission) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO contact_messages (name, email, subject, message)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                submission.name,
                submission.email,
                submission.subject,
                submission.message
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Number of stored messages.
    pub fn message_count(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM contact_messages", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            subject: "Hello".to_string(),
            message: "Testing the contact form.".to_string(),
        }
    }

    #[test]
    fn test_insert_and_count() {
        let store = MessageStore::open_in_memory().unwrap();
        assert_eq!(store.message_count().unwrap(), 0);

        let id = store.insert(&submission()).unwrap();
        assert_eq!(id, 1);
        assert_eq!(store.message_count().unwrap(), 1);

        store.insert(&submission()).unwrap();
        assert_eq!(store.message_count().unwrap(), 2);
    }

    #[test]
    fn test_schema_init_is_idempotent() {
        // Re-running the schema batch on an existing table must not fail
        let store = MessageStore::open_in_memory().unwrap();
        store.insert(&submission()).unwrap();

        let conn = store.conn.into_inner().unwrap();
        let reopened = MessageStore::init(conn).unwrap();
        assert_eq!(reopened.message_count().unwrap(), 1);
    }
}
