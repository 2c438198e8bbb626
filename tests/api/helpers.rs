use newsletter_admin::{
    authentication::compute_password_hash,
    configuration::get_configuration,
    domain::{NewSubscriber, Subscriber},
    startup::Application,
    store::InMemorySubscriberStore,
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;
use reqwest::{redirect::Policy, Client, Response};
use secrecy::Secret;
use serde::Serialize;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tempfile::TempDir;
use time::OffsetDateTime;
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let name = "test";
    let default_env_filter = "info";
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::sink);
        init_subscriber(subscriber);
    }
});

static FAILED_TO_EXECUTE_REQUEST: &str = "Failed to execute request";

pub struct TestApp {
    pub address: SocketAddr,
    pub store: Arc<InMemorySubscriberStore>,
    pub admin_password: String,
    pub export_dir: PathBuf,
    client: Client,
    _scratch: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Lazy::force(&TRACING);

        let scratch = tempfile::tempdir().expect("Failed to create scratch directory");
        let export_dir = scratch.path().join("exports");
        let admin_password = Uuid::new_v4().to_string();

        let mut config = get_configuration().expect("Failed to read configuration");
        config.application.port = 0;
        config.application.secure_cookies = false;
        config.application.export_dir = export_dir.clone();
        config.application.admin_password_hash =
            compute_password_hash(Secret::new(admin_password.clone()))
                .expect("Failed to hash admin password");
        config.redis_uri = None;

        let store = Arc::new(InMemorySubscriberStore::new());
        let app = Application::build_with_store(config, store.clone())
            .await
            .expect("Failed to build application");
        let address = app.local_addr();

        tokio::spawn(app.run_until_stopped());

        let client = Client::builder()
            .redirect(Policy::none())
            .cookie_store(true)
            .build()
            .expect("Failed to build client");

        Self {
            address,
            store,
            admin_password,
            export_dir,
            client,
            _scratch: scratch,
        }
    }

    pub fn seed(
        &self,
        email: &str,
        country: Option<&str>,
        created_at: OffsetDateTime,
    ) -> Subscriber {
        let subscriber = NewSubscriber::parse(email.into(), country.map(Into::into))
            .expect("Failed to parse subscriber");
        self.store
            .insert_at(&subscriber, created_at)
            .expect("Failed to seed subscriber")
    }

    pub async fn get(&self, endpoint: &str) -> Response {
        self.client
            .get(self.url(endpoint))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_html(&self, endpoint: &str) -> String {
        self.get(endpoint)
            .await
            .text()
            .await
            .expect("Failed to read response body")
    }

    pub async fn get_health_check(&self) -> Response {
        self.get("/health_check").await
    }

    pub async fn get_login_html(&self) -> String {
        self.get_html("/login").await
    }

    pub async fn post_login(&self, password: &str) -> Response {
        self.post_form("/login", &[("password", password)]).await
    }

    pub async fn log_in(&self) {
        let response = self.post_login(&self.admin_password).await;
        assert_is_redirect_to(&response, "/dashboard");
    }

    pub async fn get_logout(&self) -> Response {
        self.get("/logout").await
    }

    pub async fn get_dashboard(&self) -> Response {
        self.get("/dashboard").await
    }

    pub async fn get_dashboard_html(&self) -> String {
        self.get_html("/dashboard").await
    }

    pub async fn post_dashboard<Body>(&self, body: &Body) -> Response
    where
        Body: Serialize + ?Sized,
    {
        self.post_form("/dashboard", body).await
    }

    pub async fn get_subscribers_json(&self, query: &str) -> serde_json::Value {
        self.get(&format!("/api/subscribers{query}"))
            .await
            .json()
            .await
            .expect("Failed to parse subscriber listing")
    }

    pub async fn post_delete_email(&self, id: i64) -> Response {
        self.client
            .post(self.url(&format!("/delete-email/{id}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_delete_multiple_emails(&self, body: &serde_json::Value) -> Response {
        self.post_json("/delete-multiple-emails", body).await
    }

    pub async fn get_export_emails(&self, query: &str) -> Response {
        self.get(&format!("/export-emails{query}")).await
    }

    pub async fn post_subscribe(&self, body: &serde_json::Value) -> Response {
        self.post_json("/api/newsletter/subscribe", body).await
    }

    pub async fn post_unsubscribe(&self, body: &serde_json::Value) -> Response {
        self.post_json("/api/newsletter/unsubscribe", body).await
    }

    async fn post_form<Body>(&self, endpoint: &str, body: &Body) -> Response
    where
        Body: Serialize + ?Sized,
    {
        self.client
            .post(self.url(endpoint))
            .form(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    async fn post_json(&self, endpoint: &str, body: &serde_json::Value) -> Response {
        self.client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("http://{}{endpoint}", self.address)
    }
}

pub fn assert_is_redirect_to(response: &Response, location: &str) {
    assert_eq!(response.status(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), location);
}
