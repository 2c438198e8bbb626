use anyhow::{Context, Error};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tower_sessions::Session;

/// Session with typed accessors for the admin login flag.
pub struct TypedSession(Session);

impl TypedSession {
    const LOGGED_IN_KEY: &'static str = "logged_in";

    pub fn new(session: Session) -> Self {
        Self(session)
    }

    pub async fn cycle_id(&self) -> Result<(), Error> {
        self.0
            .cycle_id()
            .await
            .context("Failed to cycle session id")
    }

    pub async fn log_in(&self) -> Result<(), Error> {
        self.0
            .insert(Self::LOGGED_IN_KEY, true)
            .await
            .context("Failed to insert login flag into session")
    }

    pub async fn is_logged_in(&self) -> Result<bool, Error> {
        self.0
            .get::<bool>(Self::LOGGED_IN_KEY)
            .await
            .map(|flag| flag.unwrap_or(false))
            .context("Failed to retrieve login flag from session")
    }

    pub async fn flush(&self) -> Result<(), Error> {
        self.0.flush().await.context("Failed to flush session")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TypedSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(req: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(req, state).await?;
        Ok(TypedSession(session))
    }
}
