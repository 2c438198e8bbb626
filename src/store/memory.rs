use super::{InsertError, SubscriberStore};
use crate::{
    domain::{NewSubscriber, Subscriber},
    filter::SubscriberFilter,
};
use anyhow::anyhow;
use axum::async_trait;
use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex, MutexGuard},
};
use time::OffsetDateTime;

/// Process-local store with the same ordering, uniqueness and id rules as the
/// Postgres one. Used to run the application without a database.
#[derive(Clone, Debug, Default)]
pub struct InMemorySubscriberStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<i64, Subscriber>,
    last_id: i64,
}

impl InMemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a subscriber with an explicit creation time.
    pub fn insert_at(
        &self,
        subscriber: &NewSubscriber,
        created_at: OffsetDateTime,
    ) -> Result<Subscriber, InsertError> {
        let mut inner = self.lock()?;
        let email = subscriber.email.as_ref();

        if inner
            .rows
            .values()
            .any(|row| row.email.to_lowercase() == email.to_lowercase())
        {
            return Err(InsertError::DuplicateEmail(email.into()));
        }

        inner.last_id += 1;
        let row = Subscriber {
            id: inner.last_id,
            email: email.into(),
            country: subscriber.country.as_ref().map(|c| c.as_ref().into()),
            created_at,
        };
        inner.rows.insert(row.id, row.clone());

        Ok(row)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, anyhow::Error> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("Subscriber store lock is poisoned"))
    }

    fn matching(&self, filter: &SubscriberFilter) -> Result<Vec<Subscriber>, anyhow::Error> {
        let mut rows: Vec<_> = self
            .lock()?
            .rows
            .values()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        rows.sort_by_key(|row| Reverse((row.created_at, row.id)));

        Ok(rows)
    }
}

#[async_trait]
impl SubscriberStore for InMemorySubscriberStore {
    async fn count(&self, filter: &SubscriberFilter) -> Result<u64, anyhow::Error> {
        let inner = self.lock()?;
        let count = inner.rows.values().filter(|row| filter.matches(row)).count();

        Ok(count as u64)
    }

    async fn page(
        &self,
        filter: &SubscriberFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Subscriber>, anyhow::Error> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(self
            .matching(filter)?
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn all(&self, filter: &SubscriberFilter) -> Result<Vec<Subscriber>, anyhow::Error> {
        self.matching(filter)
    }

    async fn distinct_countries(&self) -> Result<Vec<String>, anyhow::Error> {
        let countries: BTreeSet<String> = self
            .lock()?
            .rows
            .values()
            .filter_map(|row| row.country.clone())
            .collect();

        Ok(countries.into_iter().collect())
    }

    async fn delete_by_ids(&self, ids: &BTreeSet<i64>) -> Result<u64, anyhow::Error> {
        let mut inner = self.lock()?;
        let deleted = ids
            .iter()
            .filter(|id| inner.rows.remove(*id).is_some())
            .count();

        Ok(deleted as u64)
    }

    async fn insert(&self, subscriber: &NewSubscriber) -> Result<Subscriber, InsertError> {
        self.insert_at(subscriber, OffsetDateTime::now_utc())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, anyhow::Error> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }

    async fn delete_by_email(&self, email: &str) -> Result<bool, anyhow::Error> {
        let mut inner = self.lock()?;
        let email = email.trim().to_lowercase();
        let before = inner.rows.len();
        inner.rows.retain(|_, row| row.email.to_lowercase() != email);

        Ok(inner.rows.len() < before)
    }
}
