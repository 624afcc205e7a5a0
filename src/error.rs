use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::registration::RegistrationError;
use crate::store::StoreError;
use crate::submission::IngestError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Registration(RegistrationError),
    Store(StoreError),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Registration(err) => write!(f, "Registration failed: {err}"),
            AppError::Store(err) => write!(f, "Store Error: {err}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            AppError::Registration(err) => {
                tracing::error!("Registration failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "message": "Failed to generate or send email",
                        "error": err.to_string(),
                    }),
                )
            }
            AppError::Store(err) => {
                tracing::error!("Store error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Storage unavailable" }),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidPayload => AppError::BadRequest(err.to_string()),
            err => AppError::Store(err),
        }
    }
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        AppError::Registration(err)
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::EmptyPayload | IngestError::InvalidPayload => {
                AppError::BadRequest(err.to_string())
            }
            IngestError::Store(err) => AppError::Store(err),
        }
    }
}
