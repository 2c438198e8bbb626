use crate::domain::Subscriber;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};

/// Raw filter parameters as they arrive in the dashboard query string.
///
/// Values are kept verbatim so that pagination links can carry them forward
/// unchanged, even when they do not parse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParameters {
    pub search: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FilterParameters {
    /// Non-blank parameters, keyed by their query string names.
    pub fn active(&self) -> Vec<(&'static str, &str)> {
        [
            ("search", &self.search),
            ("country", &self.country),
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
        ]
        .into_iter()
        .filter_map(|(key, value)| non_blank(value.as_deref()).map(|value| (key, value)))
        .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterClause {
    /// Case-insensitive substring match on the email address.
    EmailContains(String),
    CountryEquals(String),
    /// `from <= created_at < until`
    CreatedBetween {
        from: OffsetDateTime,
        until: OffsetDateTime,
    },
}

impl FilterClause {
    pub fn matches(&self, subscriber: &Subscriber) -> bool {
        match self {
            Self::EmailContains(term) => subscriber
                .email
                .to_lowercase()
                .contains(&term.to_lowercase()),
            Self::CountryEquals(country) => subscriber.country.as_deref() == Some(country.as_str()),
            Self::CreatedBetween { from, until } => {
                *from <= subscriber.created_at && subscriber.created_at < *until
            }
        }
    }
}

/// Conjunction of filter clauses. An empty filter matches every subscriber.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriberFilter {
    clauses: Vec<FilterClause>,
}

impl SubscriberFilter {
    pub fn everything() -> Self {
        Self::default()
    }

    #[tracing::instrument(name = "Build subscriber filter")]
    pub fn build(parameters: &FilterParameters) -> Self {
        let mut clauses = Vec::new();

        if let Some(search) = non_blank(parameters.search.as_deref()) {
            clauses.push(FilterClause::EmailContains(search.to_string()));
        }

        if let Some(country) = non_blank(parameters.country.as_deref()) {
            clauses.push(FilterClause::CountryEquals(country.trim().to_string()));
        }

        if let Some((from, until)) = date_range(
            parameters.start_date.as_deref(),
            parameters.end_date.as_deref(),
        ) {
            clauses.push(FilterClause::CreatedBetween { from, until });
        }

        Self { clauses }
    }

    pub fn by_country(country: &str) -> Self {
        Self {
            clauses: vec![FilterClause::CountryEquals(country.to_string())],
        }
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn matches(&self, subscriber: &Subscriber) -> bool {
        self.clauses.iter().all(|clause| clause.matches(subscriber))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_date(value: &str) -> Option<Date> {
    match Date::parse(value.trim(), format_description!("[year]-[month]-[day]")) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::info!("Ignoring malformed date `{value}`: {e}");
            None
        }
    }
}

// Both ends are required; a half-open range means no date filter at all.
fn date_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Option<(OffsetDateTime, OffsetDateTime)> {
    let start = parse_date(non_blank(start_date)?)?;
    let end = parse_date(non_blank(end_date)?)?;

    Some((
        start.midnight().assume_utc(),
        end.next_day()?.midnight().assume_utc(),
    ))
}
