use super::{InsertError, SubscriberStore};
use crate::{
    domain::{NewSubscriber, Subscriber},
    filter::{FilterClause, SubscriberFilter},
};
use anyhow::Context;
use axum::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::BTreeSet;

const SELECT_SUBSCRIBERS: &str = "SELECT id, email, country, created_at FROM subscribers";
const NEWEST_FIRST: &str = " ORDER BY created_at DESC, id DESC";

#[derive(Clone, Debug)]
pub struct PgSubscriberStore {
    db_pool: PgPool,
}

impl PgSubscriberStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriberStore for PgSubscriberStore {
    #[tracing::instrument(name = "Count subscribers", skip(self))]
    async fn count(&self, filter: &SubscriberFilter) -> Result<u64, anyhow::Error> {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM subscribers");
        push_filter(&mut query, filter);

        let count: i64 = query
            .build_query_scalar()
            .fetch_one(&self.db_pool)
            .await
            .context("Failed to count subscribers")?;

        u64::try_from(count).context("Subscriber count is negative")
    }

    #[tracing::instrument(name = "Fetch page of subscribers", skip(self))]
    async fn page(
        &self,
        filter: &SubscriberFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Subscriber>, anyhow::Error> {
        let mut query = QueryBuilder::new(SELECT_SUBSCRIBERS);
        push_filter(&mut query, filter);
        query
            .push(NEWEST_FIRST)
            .push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        query
            .build_query_as::<Subscriber>()
            .fetch_all(&self.db_pool)
            .await
            .context("Failed to fetch a page of subscribers")
    }

    #[tracing::instrument(name = "Fetch all matching subscribers", skip(self))]
    async fn all(&self, filter: &SubscriberFilter) -> Result<Vec<Subscriber>, anyhow::Error> {
        let mut query = QueryBuilder::new(SELECT_SUBSCRIBERS);
        push_filter(&mut query, filter);
        query.push(NEWEST_FIRST);

        query
            .build_query_as::<Subscriber>()
            .fetch_all(&self.db_pool)
            .await
            .context("Failed to fetch subscribers")
    }

    #[tracing::instrument(name = "Fetch distinct countries", skip(self))]
    async fn distinct_countries(&self) -> Result<Vec<String>, anyhow::Error> {
        sqlx::query_scalar(
            r#"
            SELECT DISTINCT country
            FROM subscribers
            WHERE country IS NOT NULL
            ORDER BY country
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Failed to fetch distinct countries")
    }

    #[tracing::instrument(name = "Delete subscribers by ids", skip(self))]
    async fn delete_by_ids(&self, ids: &BTreeSet<i64>) -> Result<u64, anyhow::Error> {
        let ids: Vec<i64> = ids.iter().copied().collect();

        let result = sqlx::query(
            r#"
            DELETE FROM subscribers
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&self.db_pool)
        .await
        .context("Failed to delete subscribers")?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(
        name = "Insert subscriber",
        skip(self, subscriber),
        fields(subscriber_email = %subscriber.email)
    )]
    async fn insert(&self, subscriber: &NewSubscriber) -> Result<Subscriber, InsertError> {
        let result = sqlx::query_as::<_, Subscriber>(
            r#"
            INSERT INTO subscribers (email, country)
            VALUES ($1, $2)
            RETURNING id, email, country, created_at
            "#,
        )
        .bind(subscriber.email.as_ref())
        .bind(subscriber.country.as_ref().map(AsRef::<str>::as_ref))
        .fetch_one(&self.db_pool)
        .await;

        match result {
            Ok(subscriber) => Ok(subscriber),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                InsertError::DuplicateEmail(subscriber.email.as_ref().into()),
            ),
            Err(e) => Err(anyhow::Error::new(e)
                .context("Failed to insert subscriber")
                .into()),
        }
    }

    #[tracing::instrument(name = "Delete subscriber by id", skip(self))]
    async fn delete_by_id(&self, id: i64) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM subscribers WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await
            .context("Failed to delete subscriber")?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(name = "Delete subscriber by email", skip(self))]
    async fn delete_by_email(&self, email: &str) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM subscribers WHERE lower(email) = lower($1)")
            .bind(email.trim())
            .execute(&self.db_pool)
            .await
            .context("Failed to delete subscriber")?;

        Ok(result.rows_affected() > 0)
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &SubscriberFilter) {
    for (i, clause) in filter.clauses().iter().enumerate() {
        query.push(if i == 0 { " WHERE " } else { " AND " });

        match clause {
            FilterClause::EmailContains(term) => {
                query
                    .push("email ILIKE ")
                    .push_bind(contains_pattern(term))
                    .push(r" ESCAPE '\'");
            }
            FilterClause::CountryEquals(country) => {
                query.push("country = ").push_bind(country.clone());
            }
            FilterClause::CreatedBetween { from, until } => {
                query
                    .push("created_at >= ")
                    .push_bind(*from)
                    .push(" AND created_at < ")
                    .push_bind(*until);
            }
        }
    }
}

// User input must match literally, so LIKE wildcards are escaped.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
