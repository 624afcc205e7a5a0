use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::registration::Registrant;
use crate::state::SharedState;
use crate::submission::parser;

pub async fn send_email(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let data = parser::parse_request(&headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let required = |key: &str| {
        parser::text_field(&data, key)
            .ok_or_else(|| AppError::BadRequest(format!("{key} is required")))
    };

    let registrant = Registrant {
        surname: required("surname")?,
        name: required("name")?,
        email: required("email")?,
        id: parser::text_field(&data, "id"),
    };

    state.registration.register(&registrant).await?;

    Ok(Json(json!({ "message": "Email sent successfully" })))
}
