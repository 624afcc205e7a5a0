use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::models::Submission;

/// Digest the unique constraint is keyed on.
pub fn payload_hash(data: &str) -> Vec<u8> {
    Sha256::digest(data.as_bytes()).to_vec()
}

/// Insert `data` unless an identical payload is already stored.
///
/// The unique constraint on `qrcodes.data_hash` decides the race: of two
/// concurrent inserts of the same payload exactly one returns a row, the
/// other returns `None`.
pub async fn insert_if_absent(
    pool: &PgPool,
    data: &str,
    created_at: DateTime<Utc>,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "INSERT INTO qrcodes (data, data_hash, created_at) VALUES ($1, $2, $3)
         ON CONFLICT (data_hash) DO NOTHING
         RETURNING id, data, created_at",
    )
    .bind(data)
    .bind(payload_hash(data))
    .bind(created_at)
    .fetch_optional(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "SELECT id, data, created_at FROM qrcodes ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

/// Remove every stored payload in one statement. The id sequence is left
/// alone so ids are never handed out twice.
pub async fn clear_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM qrcodes").execute(pool).await?;
    Ok(result.rows_affected())
}
