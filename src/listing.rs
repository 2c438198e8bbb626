use crate::{
    domain::Subscriber,
    filter::{FilterParameters, SubscriberFilter},
    pagination::{Pagination, PAGE_SIZE},
    store::SubscriberStore,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListingParameters {
    #[serde(flatten)]
    pub filter: FilterParameters,
    pub page: Option<String>,
}

/// Everything needed to render one page of the subscriber listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberListing {
    pub subscribers: Vec<Subscriber>,
    pub total_count: u64,
    pub pagination: Pagination,
    pub countries: Vec<String>,
    pub filter: FilterParameters,
}

#[tracing::instrument(name = "List subscribers", skip(store))]
pub async fn list_subscribers(
    store: &dyn SubscriberStore,
    parameters: &ListingParameters,
    base_path: &str,
) -> Result<SubscriberListing, anyhow::Error> {
    let filter = SubscriberFilter::build(&parameters.filter);
    let total_count = store.count(&filter).await?;

    let pagination = Pagination::new(
        total_count,
        PAGE_SIZE,
        Pagination::parse_page(parameters.page.as_deref()),
        base_path,
        &parameters.filter.active(),
    )
    .context("Failed to build pagination links")?;

    let subscribers = store
        .page(&filter, pagination.offset, pagination.limit)
        .await?;
    let countries = store.distinct_countries().await?;

    Ok(SubscriberListing {
        subscribers,
        total_count,
        pagination,
        countries,
        filter: parameters.filter.clone(),
    })
}
