pub mod pages;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(pages::registration_page))
        .route("/login", get(pages::login_page))
        .route("/admin", get(pages::admin_page))
}
