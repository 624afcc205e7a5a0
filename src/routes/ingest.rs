use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::parser;

pub async fn receive_qr(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let data = parser::parse_request(&headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let payload = parser::text_field(&data, "qrCodeData")
        .ok_or_else(|| AppError::BadRequest("No QR code data".to_string()))?;

    let outcome = state.ingest.submit(&payload).await?;

    let message = if outcome.stored {
        "QR code stored"
    } else {
        "QR code already registered"
    };

    Ok(Json(json!({
        "message": message,
        "data": outcome.payload,
        "isDuplicate": !outcome.stored,
    })))
}
