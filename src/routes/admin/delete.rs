use crate::{
    app_state::AppState,
    deletion::{delete_many, IdSet, RawId},
    utils::{e404, e500, json_error, HttpError},
};
use anyhow::{anyhow, Error};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_messages::Messages;
use serde::{Deserialize, Serialize};

#[tracing::instrument(name = "Delete subscriber", skip(app_state, messages))]
pub(super) async fn delete_email(
    State(app_state): State<AppState>,
    messages: Messages,
    Path(id): Path<i64>,
) -> Result<Redirect, HttpError<Error>> {
    if !app_state.store.delete_by_id(id).await.map_err(e500)? {
        return Err(e404(anyhow!("Email not found")));
    }

    messages.success("Email deleted successfully!");

    Ok(Redirect::to("/dashboard"))
}

#[derive(Deserialize)]
pub(super) struct BulkDeleteRequest {
    #[serde(default)]
    ids: Vec<RawId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BulkDeleteResponse {
    message: String,
    deleted_count: u64,
}

#[tracing::instrument(name = "Delete multiple subscribers", skip_all)]
pub(super) async fn delete_multiple_emails(
    State(app_state): State<AppState>,
    payload: Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> Response {
    let raw_ids = match payload {
        Ok(Json(request)) => request.ids,
        Err(e) => {
            tracing::info!("Rejected bulk delete request: {e}");
            return json_error(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let ids = match IdSet::parse(&raw_ids) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::info!("Rejected bulk delete request: {e}");
            return json_error(StatusCode::BAD_REQUEST, e);
        }
    };

    match delete_many(app_state.store.as_ref(), &ids).await {
        Ok(deleted_count) => Json(BulkDeleteResponse {
            message: format!("Deleted {deleted_count} email(s)"),
            deleted_count,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("{e:#?}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete emails")
        }
    }
}
