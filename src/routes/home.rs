use crate::app_state::AppState;
use axum::{response::Redirect, routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

#[tracing::instrument(name = "Redirect home to login")]
async fn home() -> Redirect {
    Redirect::to("/login")
}
