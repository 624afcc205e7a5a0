pub mod ingest;
pub mod qrcodes;
pub mod registration;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/send-email", post(registration::send_email))
        .route("/get-qrcodes", get(qrcodes::list))
        .route("/clear-qrcodes", post(qrcodes::clear))
}

/// Scan reports from the entrance devices.
pub fn ingest_routes() -> Router<SharedState> {
    Router::new().route("/receive-qr", post(ingest::receive_qr))
}
