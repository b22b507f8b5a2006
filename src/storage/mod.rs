use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::CanonicalRow;

mod sqlite;
pub use sqlite::SqliteStorage;

/// Append-only petition table keyed by `(reference_num, signatures)`.
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn migrate(&self) -> Result<(), StorageError>;
    async fn exists(&self, reference_num: &str, signatures: &str) -> Result<bool, StorageError>;
    /// Inserts and commits one row, returning its rowid.
    async fn insert(&self, row: &CanonicalRow) -> Result<i64, StorageError>;
    async fn count(&self) -> Result<u64, StorageError>;
}
