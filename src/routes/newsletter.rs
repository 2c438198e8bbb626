//! Public JSON API used by the newsletter sign-up widget.

use crate::{
    app_state::AppState,
    domain::{NewSubscriber, Subscriber},
    store::InsertError,
    utils::json_error,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/newsletter/subscribe", post(subscribe))
        .route("/api/newsletter/unsubscribe", post(unsubscribe))
}

#[derive(Deserialize)]
struct SubscribeRequest {
    #[serde(default)]
    email: String,
    country: Option<String>,
}

#[derive(Serialize)]
struct SubscribeResponse {
    message: &'static str,
    subscriber: Subscriber,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[tracing::instrument(name = "Subscribe to newsletter", skip_all)]
async fn subscribe(
    State(app_state): State<AppState>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(e) => {
            tracing::info!("Rejected subscribe request: {e}");
            return json_error(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let new_subscriber = match NewSubscriber::parse(request.email, request.country) {
        Ok(new_subscriber) => new_subscriber,
        Err(e) => {
            tracing::info!("Rejected subscribe request: {e}");
            return json_error(StatusCode::BAD_REQUEST, e);
        }
    };

    match app_state.store.insert(&new_subscriber).await {
        Ok(subscriber) => {
            tracing::info!(subscriber_id = subscriber.id, "New subscriber saved");
            (
                StatusCode::CREATED,
                Json(SubscribeResponse {
                    message: "Subscribed successfully",
                    subscriber,
                }),
            )
                .into_response()
        }
        Err(InsertError::DuplicateEmail(email)) => {
            tracing::info!("`{email}` is already subscribed");
            json_error(StatusCode::CONFLICT, "Email already subscribed")
        }
        Err(InsertError::UnexpectedError(e)) => {
            tracing::error!("{e:#?}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to subscribe")
        }
    }
}

#[derive(Deserialize)]
struct UnsubscribeRequest {
    #[serde(default)]
    email: String,
}

#[tracing::instrument(name = "Unsubscribe from newsletter", skip_all)]
async fn unsubscribe(
    State(app_state): State<AppState>,
    payload: Result<Json<UnsubscribeRequest>, JsonRejection>,
) -> Response {
    let email = match payload {
        Ok(Json(request)) if !request.email.trim().is_empty() => request.email,
        Ok(_) => return json_error(StatusCode::BAD_REQUEST, "Email is required"),
        Err(e) => {
            tracing::info!("Rejected unsubscribe request: {e}");
            return json_error(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    match app_state.store.delete_by_email(&email).await {
        Ok(true) => Json(MessageResponse {
            message: "Unsubscribed successfully",
        })
        .into_response(),
        Ok(false) => json_error(StatusCode::NOT_FOUND, "Email not found"),
        Err(e) => {
            tracing::error!("{e:#?}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to unsubscribe")
        }
    }
}
