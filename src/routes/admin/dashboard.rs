use crate::{
    app_state::AppState,
    domain::{NewSubscriber, SubscriberEmail},
    listing::{list_subscribers, ListingParameters, SubscriberListing},
    store::InsertError,
    utils::{e500, HttpError},
};
use anyhow::Error;
use askama_axum::Template;
use axum::{
    extract::{Query, State},
    response::Redirect,
    Form,
};
use axum_messages::Messages;
use serde::Deserialize;

#[tracing::instrument(name = "Get admin dashboard", skip(app_state, messages))]
pub(super) async fn admin_dashboard(
    State(app_state): State<AppState>,
    messages: Messages,
    Query(parameters): Query<ListingParameters>,
) -> Result<Dashboard<'static>, HttpError<Error>> {
    let listing = list_subscribers(app_state.store.as_ref(), &parameters, "/dashboard")
        .await
        .map_err(e500)?;

    Ok(Dashboard::new(listing, messages.map(|m| m.message).collect()))
}

#[derive(Deserialize)]
pub(super) struct NewSubscriberForm {
    email: String,
    country: Option<String>,
}

#[tracing::instrument(
    name = "Add subscriber from dashboard",
    skip(app_state, messages, form),
    fields(subscriber_email = %form.email)
)]
pub(super) async fn add_subscriber(
    State(app_state): State<AppState>,
    messages: Messages,
    Form(form): Form<NewSubscriberForm>,
) -> Result<Redirect, HttpError<Error>> {
    if let Err(e) = SubscriberEmail::parse(form.email.clone()) {
        tracing::info!("Rejected new subscriber: {e}");
        messages.error("Invalid email format.");
        return Ok(Redirect::to("/dashboard"));
    }

    let subscriber = match NewSubscriber::parse(form.email, form.country) {
        Ok(subscriber) => subscriber,
        Err(e) => {
            tracing::info!("Rejected new subscriber: {e}");
            messages.error(e);
            return Ok(Redirect::to("/dashboard"));
        }
    };

    match app_state.store.insert(&subscriber).await {
        Ok(_) => {
            messages.success("Email added successfully!");
        }
        Err(InsertError::DuplicateEmail(_)) => {
            messages.error("Email already exists!");
        }
        Err(InsertError::UnexpectedError(e)) => return Err(e500(e)),
    }

    Ok(Redirect::to("/dashboard"))
}

#[derive(Template)]
#[template(path = "web/dashboard.html")]
pub(super) struct Dashboard<'a> {
    page_title: &'a str,
    listing: SubscriberListing,
    search: String,
    selected_country: String,
    start_date: String,
    end_date: String,
    flashes: Vec<String>,
}

impl Dashboard<'_> {
    fn new(listing: SubscriberListing, flashes: Vec<String>) -> Self {
        let filter = &listing.filter;
        let value = |v: &Option<String>| v.clone().unwrap_or_default();

        Self {
            page_title: "Newsletter Subscribers",
            search: value(&filter.search),
            selected_country: value(&filter.country),
            start_date: value(&filter.start_date),
            end_date: value(&filter.end_date),
            listing,
            flashes,
        }
    }
}
