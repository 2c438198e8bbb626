use crate::{app_state::AppState, authentication::AuthorizedSessionLayer};
use axum::{
    routing::{get, post},
    Router,
};
use dashboard::{add_subscriber, admin_dashboard};
use delete::{delete_email, delete_multiple_emails};
use export::{export_emails, export_form};
use subscribers::list_subscribers_json;

mod dashboard;
mod delete;
mod export;
mod subscribers;

/// Routes that require a logged-in admin session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin_dashboard).post(add_subscriber))
        .route("/delete-email/:id", post(delete_email))
        .route("/delete-multiple-emails", post(delete_multiple_emails))
        .route("/export", get(export_form))
        .route("/export-emails", get(export_emails))
        .route("/api/subscribers", get(list_subscribers_json))
        .layer(AuthorizedSessionLayer)
}
