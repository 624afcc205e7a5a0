use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{InsertOutcome, StoreError, SubmissionStore, check_payload};
use crate::db;
use crate::models::Submission;

#[derive(Debug, Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    /// Connect and bring the schema up to date before the store is handed out.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = db::connect(database_url, max_connections).await?;
        Self::init(pool).await
    }

    /// Wrap an existing pool, creating the table if it is missing.
    pub async fn init(pool: PgPool) -> Result<Self, StoreError> {
        db::migrate(&pool).await?;
        tracing::info!("Submission store schema ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn insert_if_absent(
        &self,
        payload: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<InsertOutcome, StoreError> {
        check_payload(payload)?;
        let row = db::submissions::insert_if_absent(&self.pool, payload, timestamp).await?;
        Ok(match row {
            Some(submission) => InsertOutcome::Inserted(submission),
            None => InsertOutcome::Duplicate,
        })
    }

    async fn list_all(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(db::submissions::list_all(&self.pool).await?)
    }

    async fn clear_all(&self) -> Result<u64, StoreError> {
        Ok(db::submissions::clear_all(&self.pool).await?)
    }
}
