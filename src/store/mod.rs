pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::Submission;

pub use memory::MemorySubmissionStore;
pub use postgres::PgSubmissionStore;

#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(Submission),
    Duplicate,
}

impl InsertOutcome {
    pub fn inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    Migration(sqlx::migrate::MigrateError),
    Unavailable(String),
    /// The payload cannot be stored as text (it contains a NUL byte).
    InvalidPayload,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(err) => write!(f, "Database error: {err}"),
            StoreError::Migration(err) => write!(f, "Migration error: {err}"),
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {msg}"),
            StoreError::InvalidPayload => write!(f, "QR code data must not contain NUL bytes"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Migration(err)
    }
}

/// Postgres `TEXT` cannot hold NUL, so every backend refuses it.
pub fn check_payload(payload: &str) -> Result<(), StoreError> {
    if payload.contains('\0') {
        return Err(StoreError::InvalidPayload);
    }
    Ok(())
}

/// Durable collection of scanned payloads, unique on payload text.
///
/// Implementations must make `insert_if_absent` atomic on their own side:
/// callers never check for presence first.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Returns `Duplicate` (not an error) when the payload is already stored.
    async fn insert_if_absent(
        &self,
        payload: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<InsertOutcome, StoreError>;

    /// Every stored submission, newest first.
    async fn list_all(&self) -> Result<Vec<Submission>, StoreError>;

    /// Remove everything, all or nothing. Returns the number of rows removed.
    async fn clear_all(&self) -> Result<u64, StoreError>;
}
