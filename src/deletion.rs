use crate::store::SubscriberStore;
use serde::Deserialize;
use std::collections::BTreeSet;

/// An id as sent by the dashboard: checkbox values arrive as strings, API
/// clients tend to send numbers.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

/// Non-empty set of well-formed subscriber ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdSet(BTreeSet<i64>);

impl IdSet {
    pub fn parse(raw: &[RawId]) -> Result<Self, String> {
        if raw.is_empty() {
            return Err("No email IDs provided".into());
        }

        let ids = raw
            .iter()
            .map(|id| {
                let parsed = match id {
                    RawId::Number(n) => Some(*n),
                    RawId::Text(s) => s.trim().parse::<i64>().ok(),
                };
                parsed
                    .filter(|n| *n > 0)
                    .ok_or_else(|| "Email IDs must be positive integers".to_string())
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self(ids))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl AsRef<BTreeSet<i64>> for IdSet {
    fn as_ref(&self) -> &BTreeSet<i64> {
        &self.0
    }
}

/// Deletes all ids in one store operation. Ids that are already gone simply
/// do not count towards the result.
#[tracing::instrument(name = "Delete many subscribers", skip(store))]
pub async fn delete_many(store: &dyn SubscriberStore, ids: &IdSet) -> Result<u64, anyhow::Error> {
    let deleted = store.delete_by_ids(ids.as_ref()).await?;
    tracing::info!("Deleted {deleted} of {} requested subscribers", ids.len());

    Ok(deleted)
}
