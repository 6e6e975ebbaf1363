//! Integration tests for the grievance desk server.
//!
//! Each test spawns the real router (full middleware stack, signed session
//! cookies) on an ephemeral port, backed by the in-memory grievance store
//! and a switchable wrapper around the tower-sessions memory store. No
//! database is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p grievance-integration-tests
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header::LOCATION, redirect::Policy};
use secrecy::SecretString;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};

use grievance_core::UserRole;
use grievance_server::config::ServerConfig;
use grievance_server::db::MemoryStore;
use grievance_server::models::User;
use grievance_server::services::auth::AuthService;
use grievance_server::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@grievance.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// A running server plus direct access to its stores.
pub struct TestApp {
    pub base_url: String,
    pub store: MemoryStore,
    pub sessions: SessionBackend,
}

/// Session store that can be switched into a failing state mid-test.
#[derive(Debug, Clone, Default)]
pub struct SessionBackend {
    inner: tower_sessions::MemoryStore,
    unavailable: Arc<AtomicBool>,
}

impl SessionBackend {
    /// Make every subsequent session load and save fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> session_store::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(session_store::Error::Backend(
                "session backend unavailable".to_owned(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for SessionBackend {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        self.check_available()?;
        self.inner.create(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.check_available()?;
        self.inner.save(record).await
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        self.check_available()?;
        self.inner.load(session_id).await
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.check_available()?;
        self.inner.delete(session_id).await
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("postgres://unused"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://127.0.0.1".to_owned(),
        session_secret: SecretString::from("integration-test-session-secret-Zq8vR3kT7wXy"),
        session_expiry: Duration::from_secs(24 * 60 * 60),
        store_timeout: Duration::from_secs(5),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

impl TestApp {
    /// Start a server on `127.0.0.1:0` with an admin account seeded.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or seeding fails.
    pub async fn spawn() -> Self {
        let store = MemoryStore::new();
        let sessions = SessionBackend::default();
        let state = AppState::new(test_config(), Arc::new(store.clone()));
        let app = grievance_server::app(state, sessions.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        let test_app = Self {
            base_url: format!("http://{addr}"),
            store,
            sessions,
        };
        test_app
            .seed_account("admin", ADMIN_EMAIL, ADMIN_PASSWORD, UserRole::Admin)
            .await;
        test_app
    }

    /// Create an account directly in the store.
    ///
    /// # Panics
    ///
    /// Panics if the account cannot be created.
    pub async fn seed_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> User {
        AuthService::new(&self.store)
            .create_account(username, email, password, role)
            .await
            .expect("Failed to seed account")
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log `client` in as the seeded admin.
    ///
    /// # Panics
    ///
    /// Panics if the login does not redirect to the dashboard.
    pub async fn login_admin(&self, client: &Client) {
        let resp = self
            .post_form(
                client,
                "/admin-login",
                &[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)],
            )
            .await;
        assert_redirect(&resp, "/admin-dashboard");
    }

    /// Log `client` in as a complainant.
    ///
    /// # Panics
    ///
    /// Panics if the login does not redirect to the complaint list.
    pub async fn login_user(&self, client: &Client, email: &str, password: &str) {
        let resp = self
            .post_form(client, "/login", &[("email", email), ("password", password)])
            .await;
        assert_redirect(&resp, "/complaints");
    }

    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn get(&self, client: &Client, path: &str) -> Response {
        client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET")
    }

    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn post_form(&self, client: &Client, path: &str, form: &[(&str, &str)]) -> Response {
        client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to send POST")
    }
}

/// A browser-like client: keeps cookies, does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Assert a 303 redirect to `location`.
///
/// # Panics
///
/// Panics if the response is not the expected redirect.
pub fn assert_redirect(resp: &Response, location: &str) {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "expected redirect");
    assert_eq!(
        resp.headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some(location)
    );
}

/// Read a response body as text.
///
/// # Panics
///
/// Panics if the body cannot be read.
pub async fn body(resp: Response) -> String {
    resp.text().await.expect("Failed to read response body")
}
