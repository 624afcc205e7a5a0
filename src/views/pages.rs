use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::error::AppError;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "registration.html")]
struct RegistrationTemplate {
    sender: String,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate;

struct SubmissionRow {
    id: i64,
    data: String,
    timestamp: String,
}

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate {
    rows: Vec<SubmissionRow>,
    total: usize,
}

pub async fn registration_page(State(state): State<SharedState>) -> impl IntoResponse {
    let template = RegistrationTemplate {
        sender: state.config.mail.from.clone(),
    };
    Html(template.render().unwrap_or_default())
}

pub async fn login_page() -> impl IntoResponse {
    Html(LoginTemplate.render().unwrap_or_default())
}

pub async fn admin_page(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let submissions = state.store.list_all().await?;

    let rows: Vec<SubmissionRow> = submissions
        .into_iter()
        .map(|s| SubmissionRow {
            id: s.id,
            data: s.data,
            timestamp: s.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        })
        .collect();

    let template = AdminTemplate {
        total: rows.len(),
        rows,
    };

    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("Template error: {e}")))?;
    Ok(Html(html))
}
