use crate::{
    app_state::AppState,
    session_state::TypedSession,
    utils::{e500, HttpError},
};
use axum::{response::Redirect, routing::get, Router};
use axum_messages::Messages;

pub fn router() -> Router<AppState> {
    Router::new().route("/logout", get(log_out))
}

#[tracing::instrument(skip(session, messages))]
async fn log_out(
    session: TypedSession,
    messages: Messages,
) -> Result<Redirect, HttpError<anyhow::Error>> {
    if session.is_logged_in().await.map_err(e500)? {
        session.flush().await.map_err(e500)?;
        messages.info("You have successfully logged out.");
    }

    Ok(Redirect::to("/login"))
}
