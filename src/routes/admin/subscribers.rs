use crate::{
    app_state::AppState,
    listing::{list_subscribers, ListingParameters, SubscriberListing},
    utils::{e500, HttpError},
};
use axum::{
    extract::{Query, State},
    Json,
};

#[tracing::instrument(name = "List subscribers as JSON", skip(app_state))]
pub(super) async fn list_subscribers_json(
    State(app_state): State<AppState>,
    Query(parameters): Query<ListingParameters>,
) -> Result<Json<SubscriberListing>, HttpError<anyhow::Error>> {
    let listing = list_subscribers(app_state.store.as_ref(), &parameters, "/api/subscribers")
        .await
        .map_err(e500)?;

    Ok(Json(listing))
}
