//! Subscriber persistence.
//!
//! Everything that reads or removes subscribers goes through
//! [`SubscriberStore`], so the listing and export code never sees SQL.

mod memory;
mod postgres;

pub use memory::InMemorySubscriberStore;
pub use postgres::PgSubscriberStore;

use crate::{
    domain::{NewSubscriber, Subscriber},
    filter::SubscriberFilter,
};
use axum::async_trait;
use std::collections::BTreeSet;

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn count(&self, filter: &SubscriberFilter) -> Result<u64, anyhow::Error>;

    /// Newest subscribers first.
    async fn page(
        &self,
        filter: &SubscriberFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Subscriber>, anyhow::Error>;

    /// Newest subscribers first.
    async fn all(&self, filter: &SubscriberFilter) -> Result<Vec<Subscriber>, anyhow::Error>;

    async fn distinct_countries(&self) -> Result<Vec<String>, anyhow::Error>;

    /// Removes every listed subscriber in one operation and returns how many
    /// rows were actually deleted.
    async fn delete_by_ids(&self, ids: &BTreeSet<i64>) -> Result<u64, anyhow::Error>;

    async fn insert(&self, subscriber: &NewSubscriber) -> Result<Subscriber, InsertError>;

    async fn delete_by_id(&self, id: i64) -> Result<bool, anyhow::Error>;

    async fn delete_by_email(&self, email: &str) -> Result<bool, anyhow::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    #[error("`{0}` is already subscribed")]
    DuplicateEmail(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}
