use crate::{
    app_state::AppState,
    configuration::{DatabaseSettings, Settings},
    routes::{admin, health_check, home, login, logout, newsletter, not_found::not_found},
    store::{PgSubscriberStore, SubscriberStore},
    telemetry::{request_span, RequestUuid, REQUEST_ID_HEADER},
};
use anyhow::Context;
use axum::{http::HeaderName, Router};
use axum_messages::MessagesManagerLayer;
use secrecy::{ExposeSecret, Secret};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use time::Duration;
use tower_sessions::{cookie::Key, Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_redis_store::{fred::prelude::*, RedisStore};

pub struct Application {
    address: SocketAddr,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Builds the application backed by Postgres.
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let db_pool = get_connection_pool(&config.database);
        let store = Arc::new(PgSubscriberStore::new(db_pool));

        Self::build_with_store(config, store).await
    }

    pub async fn build_with_store(
        config: Settings,
        store: Arc<dyn SubscriberStore>,
    ) -> Result<Self, anyhow::Error> {
        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind to {address}"))?;
        let address = listener
            .local_addr()
            .context("Failed to read local address")?;

        let key = Key::try_from(config.application.hmac_secret.expose_secret().as_bytes())
            .context("HMAC secret must be at least 64 bytes long")?;
        let secure_cookies = config.application.secure_cookies;

        let app_state = AppState {
            store,
            admin_password_hash: Arc::new(config.application.admin_password_hash),
            export_dir: Arc::new(config.application.export_dir),
        };

        let router = match config.redis_uri {
            Some(redis_uri) => {
                let session_store = get_redis_store(&redis_uri).await?;
                app_router(app_state, session_store, key, secure_cookies)
            }
            None => {
                tracing::warn!("No Redis configured, sessions are kept in memory");
                app_router(app_state, MemoryStore::default(), key, secure_cookies)
            }
        };

        Ok(Self {
            address,
            listener,
            router,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.address
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!("Listening on {}", self.address);
        axum::serve(self.listener, self.router).await
    }
}

pub fn get_connection_pool(config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.with_db())
}

async fn get_redis_store(redis_uri: &Secret<String>) -> Result<RedisStore<RedisPool>, anyhow::Error> {
    let redis_config =
        RedisConfig::from_url(redis_uri.expose_secret()).context("Invalid Redis URI")?;
    let pool = RedisPool::new(redis_config, None, None, None, 6)
        .context("Failed to create Redis pool")?;

    pool.connect();
    pool.wait_for_connect()
        .await
        .context("Failed to connect to Redis")?;

    Ok(RedisStore::new(pool))
}

fn app_router<S>(app_state: AppState, session_store: S, key: Key, secure_cookies: bool) -> Router
where
    S: SessionStore + Clone,
{
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_private(key)
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)));

    Router::new()
        .merge(admin::router())
        .merge(health_check::router())
        .merge(home::router())
        .merge(login::router())
        .merge(logout::router())
        .merge(newsletter::router())
        .fallback(not_found)
        .with_state(app_state)
        .layer(MessagesManagerLayer)
        .layer(session_layer)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    request_id_header.clone(),
                    RequestUuid,
                ))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(PropagateRequestIdLayer::new(request_id_header)),
        )
}
