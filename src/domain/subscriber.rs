use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// A stored newsletter recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub country: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Subscriber {
    pub fn country_or_empty(&self) -> &str {
        self.country.as_deref().unwrap_or_default()
    }
}
