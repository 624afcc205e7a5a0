pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod models;
pub mod qr;
pub mod registration;
pub mod routes;
pub mod state;
pub mod store;
pub mod submission;
pub mod views;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::MailDispatcher;
use crate::qr::QrEncoder;
use crate::registration::RegistrationService;
use crate::state::{AppState, SharedState};
use crate::store::SubmissionStore;
use crate::submission::IngestService;

/// Assemble the router. Collaborators come in as trait objects so tests can
/// swap in an in-memory store and fake mailers.
pub fn build_app(
    config: Config,
    store: Arc<dyn SubmissionStore>,
    encoder: Arc<dyn QrEncoder>,
    mailer: Arc<dyn MailDispatcher>,
) -> Router {
    let max_body_size = config.max_body_size;
    let static_dir = config.static_dir.clone();

    let state: SharedState = Arc::new(AppState {
        ingest: IngestService::new(store.clone()),
        registration: RegistrationService::new(encoder, mailer),
        store,
        config,
    });

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    Router::new()
        .merge(routes::api_routes())
        .merge(routes::ingest_routes())
        .merge(views::view_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(security_headers)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
