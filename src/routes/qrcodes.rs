use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::models::Submission;
use crate::state::SharedState;

pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<Submission>>, AppError> {
    let submissions = state.store.list_all().await?;
    Ok(Json(submissions))
}

pub async fn clear(State(state): State<SharedState>) -> Result<Json<Value>, AppError> {
    let deleted = state.store.clear_all().await?;
    tracing::info!("Cleared {deleted} QR codes");

    Ok(Json(json!({
        "message": "QR codes cleared",
        "deleted": deleted,
    })))
}
