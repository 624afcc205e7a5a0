use std::sync::Arc;

use chrono::Utc;

use crate::store::{InsertOutcome, StoreError, SubmissionStore, check_payload};

#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub stored: bool,
    pub payload: String,
}

#[derive(Debug)]
pub enum IngestError {
    EmptyPayload,
    InvalidPayload,
    Store(StoreError),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::EmptyPayload => write!(f, "No QR code data"),
            IngestError::InvalidPayload => write!(f, "QR code data must not contain NUL bytes"),
            IngestError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl From<StoreError> for IngestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidPayload => IngestError::InvalidPayload,
            err => IngestError::Store(err),
        }
    }
}

/// Classifies scan reports as new or duplicate and stores the new ones.
#[derive(Clone)]
pub struct IngestService {
    store: Arc<dyn SubmissionStore>,
}

impl IngestService {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self { store }
    }

    /// Store `payload` unless it has been seen before.
    ///
    /// The decision is made by the store's conditional insert; there is no
    /// separate lookup here.
    pub async fn submit(&self, payload: &str) -> Result<IngestOutcome, IngestError> {
        if payload.is_empty() {
            return Err(IngestError::EmptyPayload);
        }
        check_payload(payload)?;

        let outcome = self.store.insert_if_absent(payload, Utc::now()).await?;

        match &outcome {
            InsertOutcome::Inserted(submission) => {
                tracing::info!("Stored QR code #{}: {payload}", submission.id);
            }
            InsertOutcome::Duplicate => {
                tracing::debug!("Duplicate QR code: {payload}");
            }
        }

        Ok(IngestOutcome {
            stored: outcome.inserted(),
            payload: payload.to_string(),
        })
    }
}
