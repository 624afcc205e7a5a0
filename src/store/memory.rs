use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{InsertOutcome, StoreError, SubmissionStore, check_payload};
use crate::models::Submission;

/// Process-local store with the same uniqueness guarantee as the Postgres
/// one. The whole check-and-insert happens under a single lock.
#[derive(Debug, Default)]
pub struct MemorySubmissionStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    seen: HashSet<String>,
    rows: Vec<Submission>,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    async fn insert_if_absent(
        &self,
        payload: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<InsertOutcome, StoreError> {
        check_payload(payload)?;
        let mut inner = self.lock()?;
        if !inner.seen.insert(payload.to_string()) {
            return Ok(InsertOutcome::Duplicate);
        }

        inner.next_id += 1;
        let submission = Submission {
            id: inner.next_id,
            data: payload.to_string(),
            created_at: timestamp,
        };
        inner.rows.push(submission.clone());
        Ok(InsertOutcome::Inserted(submission))
    }

    async fn list_all(&self) -> Result<Vec<Submission>, StoreError> {
        let inner = self.lock()?;
        let mut rows = inner.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn clear_all(&self) -> Result<u64, StoreError> {
        let mut inner = self.lock()?;
        let removed = inner.rows.len() as u64;
        inner.rows.clear();
        inner.seen.clear();
        Ok(removed)
    }
}
