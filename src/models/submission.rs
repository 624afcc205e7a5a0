use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scanned QR payload that has been accepted into the store.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub data: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}
