use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::error::StorageError;
use crate::models::CanonicalRow;
use crate::storage::RowStore;

pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    /// Releases the handle. Dropping the store does the same without reporting errors.
    pub fn close(self) -> Result<(), StorageError> {
        let conn = self.conn.into_inner().map_err(|_| StorageError::Poisoned)?;
        conn.close().map_err(|(_, e)| StorageError::Sqlite(e))?;
        info!("Database closed");
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }
}

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl RowStore for SqliteStorage {
    async fn migrate(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS data (
                retrieved_at TEXT,
                url TEXT,
                reference_name TEXT,
                reference_num TEXT,
                subject TEXT,
                signatures TEXT,
                closed_at TEXT,
                body TEXT,
                principal TEXT,
                eligibility TEXT,
                sponsor TEXT,
                posted_at TEXT,
                addressed_to TEXT,
                UNIQUE (reference_num, signatures)
            )",
            [],
        )?;

        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS reference_num_signatures
                ON data (reference_num, signatures)",
            [],
        )?;

        info!("Database migration completed");
        Ok(())
    }

    async fn exists(&self, reference_num: &str, signatures: &str) -> Result<bool, StorageError> {
        let conn = self.conn()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM data WHERE reference_num = ?1 AND signatures = ?2",
            params![reference_num, signatures],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    async fn insert(&self, row: &CanonicalRow) -> Result<i64, StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO data
                (retrieved_at, url, reference_name, reference_num,
                 subject, signatures, closed_at, body, principal,
                 eligibility, sponsor, posted_at, addressed_to)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                row.retrieved_at,
                row.url,
                row.reference_name,
                row.reference_num,
                row.subject,
                row.signatures,
                row.closed_at,
                row.body,
                row.principal,
                row.eligibility,
                row.sponsor,
                row.posted_at,
                row.addressed_to,
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(StorageError::ConstraintViolation {
                    reference_num: row.reference_num.clone(),
                    signatures: row.signatures.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let row_id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(row_id)
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM data", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}
